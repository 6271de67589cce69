//! Configuration module for Company-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to the defaults
//! for the jobinja.ir company listing.
//!
//! # Example
//!
//! ```no_run
//! use company_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Snapshot goes to: {}", config.output.snapshot_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ErrorPolicy, ExtractConfig, FetcherConfig, OutputConfig, RetryConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
