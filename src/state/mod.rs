//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: where a crawl pass currently is in its listing page loop

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
