//! Company-Harvester: a paginated company listing crawler
//!
//! This crate walks the company listing pages of a job board, extracts each
//! company and its open job postings, and writes the aggregated result as a
//! JSON snapshot for the landing page to serve.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Errors that end a crawl pass or prevent it from starting
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Listing page {page} still timing out after {attempts} attempts")]
    RetriesExhausted { page: u32, attempts: u32 },

    #[error("Gave up at listing page {page} after {skipped} consecutive skipped pages")]
    PagesAbandoned { page: u32, skipped: u32 },

    #[error("Crawl pass cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use model::{EmploymentType, Organization, Posting, Snapshot};
pub use state::CrawlState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_error_messages() {
        let abandoned = HarvestError::PagesAbandoned {
            page: 12,
            skipped: 10,
        };
        assert_eq!(
            abandoned.to_string(),
            "Gave up at listing page 12 after 10 consecutive skipped pages"
        );

        let transition = HarvestError::InvalidTransition {
            from: CrawlState::Done,
            to: CrawlState::FetchingPage(1),
        };
        assert_eq!(
            transition.to_string(),
            "Invalid state transition: Done -> FetchingPage(1)"
        );
    }
}
