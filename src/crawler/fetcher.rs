//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building a fresh browsing session (cookie-aware client) per request
//! - Enforcing the fixed per-request timeout
//! - Classifying failures as timeouts or other fetch errors

use crate::config::FetcherConfig;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Errors from a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Returns true if the request ran out of time
    ///
    /// Only listing page timeouts lead to the long cooldown; every other
    /// failure is handled by the error policy.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Opens a URL and returns its rendered document
///
/// The crawler only talks to the network through this trait, so passes can
/// be driven by canned pages in tests.
pub trait PageFetcher {
    fn open(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

impl<T: PageFetcher> PageFetcher for &T {
    fn open(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        (**self).open(url)
    }
}

/// Fetcher that opens every URL in its own browsing session
#[derive(Debug, Clone)]
pub struct SessionFetcher {
    user_agent: String,
    timeout: Duration,
}

impl SessionFetcher {
    pub fn new(config: &FetcherConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the HTTP client for one session
    ///
    /// Cookies set during redirects stay within the session and are dropped
    /// with it.
    pub fn build_session(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
    }
}

impl PageFetcher for SessionFetcher {
    /// Fetches a URL
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout while sending or reading the body | `Timeout` |
    /// | Non-2xx status | `Status` |
    /// | Connection, TLS, redirect or decode failure | `Network` |
    /// | Client could not be built | `Client` |
    async fn open(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let client = self.build_session().map_err(FetchError::Client)?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
