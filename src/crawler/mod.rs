//! Crawler module for listing page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout classification
//! - Retry and backoff policy for listing pages
//! - Overall crawl pass coordination

mod coordinator;
mod fetcher;
mod retry;

pub use coordinator::{run_pass, Coordinator, CrawlSettings};
pub use fetcher::{FetchError, FetchedPage, PageFetcher, SessionFetcher};
pub use retry::{RetryDecision, RetryPolicy};
