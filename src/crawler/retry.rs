//! Retry policy for listing page fetches
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Timeout | Cool down, retry the same page; unbounded unless `max_timeout_retries` is set |
//! | Other error, `retry-then-skip` | Retry the same page up to `max_error_retries` times, then skip it |
//! | Other error, `skip-page` | Skip to the next page immediately |
//!
//! Company detail fetches are never retried.

use crate::config::{ErrorPolicy, RetryConfig};
use std::time::Duration;

/// What the crawler should do after a failed listing page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait, then fetch the same page again
    Retry(Duration),

    /// Move on to the next page
    Skip,

    /// Abandon the pass
    GiveUp,
}

/// Retry and backoff parameters injected into the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout_cooldown: Duration,
    pub max_timeout_retries: Option<u32>,
    pub error_policy: ErrorPolicy,
    pub max_error_retries: u32,
    pub error_delay: Duration,
    pub max_consecutive_skipped_pages: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            timeout_cooldown: Duration::from_secs(config.timeout_cooldown_secs),
            max_timeout_retries: config.max_timeout_retries,
            error_policy: config.error_policy,
            max_error_retries: config.max_error_retries,
            error_delay: Duration::from_millis(config.error_delay_ms),
            max_consecutive_skipped_pages: config.max_consecutive_skipped_pages,
        }
    }
}

impl RetryPolicy {
    /// Decision after the `attempt`-th consecutive timeout on a page (1-based)
    pub fn on_timeout(&self, attempt: u32) -> RetryDecision {
        match self.max_timeout_retries {
            Some(max) if attempt > max => RetryDecision::GiveUp,
            _ => RetryDecision::Retry(self.timeout_cooldown),
        }
    }

    /// Decision after the `attempt`-th consecutive non-timeout failure on a page (1-based)
    pub fn on_error(&self, attempt: u32) -> RetryDecision {
        match self.error_policy {
            ErrorPolicy::SkipPage => RetryDecision::Skip,
            ErrorPolicy::RetryThenSkip if attempt > self.max_error_retries => RetryDecision::Skip,
            ErrorPolicy::RetryThenSkip => RetryDecision::Retry(self.error_delay),
        }
    }

    /// Returns true if this many consecutive skipped pages ends the pass
    pub fn skip_limit_reached(&self, consecutive_skipped: u32) -> bool {
        consecutive_skipped >= self.max_consecutive_skipped_pages
    }
}
