//! Crawl pass state definitions
//!
//! A pass moves through listing pages one at a time. Every state except
//! `Done` carries the listing page number it is working on.

use std::fmt;

/// Represents the current state of a crawl pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Listing page `n` is being fetched
    FetchingPage(u32),

    /// Listing page `n` failed and is waiting to be fetched again
    AwaitingRetry(u32),

    /// The companies found on listing page `n` are being processed
    ProcessingOrganizations(u32),

    /// An empty listing page was reached; the snapshot is handed to the sink
    Done,
}

impl CrawlState {
    /// State a pass starts in
    pub fn initial(first_page: u32) -> Self {
        Self::FetchingPage(first_page)
    }

    /// Listing page the state refers to, `None` once the pass is done
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::FetchingPage(n) | Self::AwaitingRetry(n) | Self::ProcessingOrganizations(n) => {
                Some(*n)
            }
            Self::Done => None,
        }
    }

    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving to `next` is a legal transition
    ///
    /// # Valid Transitions
    ///
    /// - FetchingPage(n) → AwaitingRetry(n) (fetch failed, will retry)
    /// - FetchingPage(n) → FetchingPage(n + 1) (failing page skipped)
    /// - FetchingPage(n) → ProcessingOrganizations(n) (companies found)
    /// - FetchingPage(n) → Done (empty listing page)
    /// - AwaitingRetry(n) → FetchingPage(n) (delay elapsed)
    /// - ProcessingOrganizations(n) → FetchingPage(n + 1) (page finished)
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        match (self, next) {
            (Self::FetchingPage(n), Self::AwaitingRetry(m)) => n == m,
            (Self::FetchingPage(n), Self::FetchingPage(m)) => n.checked_add(1) == Some(*m),
            (Self::FetchingPage(n), Self::ProcessingOrganizations(m)) => n == m,
            (Self::FetchingPage(_), Self::Done) => true,
            (Self::AwaitingRetry(n), Self::FetchingPage(m)) => n == m,
            (Self::ProcessingOrganizations(n), Self::FetchingPage(m)) => {
                n.checked_add(1) == Some(*m)
            }
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingPage(n) => write!(f, "FetchingPage({})", n),
            Self::AwaitingRetry(n) => write!(f, "AwaitingRetry({})", n),
            Self::ProcessingOrganizations(n) => write!(f, "ProcessingOrganizations({})", n),
            Self::Done => write!(f, "Done"),
        }
    }
}
