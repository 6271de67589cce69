use serde::Deserialize;

/// Main configuration structure for Company-Harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Source site URL templates
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing page URL, `{page}` is replaced by the page number
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Company profile URL, `{id}` is replaced by the company id
    #[serde(rename = "organization-url")]
    pub organization_url: String,

    /// Company job list URL, `{id}` is replaced by the company id
    #[serde(rename = "organization-jobs-url")]
    pub organization_jobs_url: String,

    /// Number of the first listing page
    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url:
                "https://jobinja.ir/company/list/کامپیوتر-فناوری-اطلاعات-و-اینترنت?page={page}"
                    .to_string(),
            organization_url: "https://jobinja.ir/companies/{id}".to_string(),
            organization_jobs_url: "https://jobinja.ir/companies/{id}/jobs".to_string(),
            first_page: default_first_page(),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// What to do with a listing page whose fetch fails for a reason other than a timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Retry the same page up to `max-error-retries` times, then move on to the next page
    #[default]
    RetryThenSkip,

    /// Move on to the next page immediately
    SkipPage,
}

/// Retry and backoff configuration for listing page fetches
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Cooldown after a listing page timeout (seconds)
    #[serde(rename = "timeout-cooldown-secs", default = "default_timeout_cooldown_secs")]
    pub timeout_cooldown_secs: u64,

    /// Maximum retries of a timing-out page; unset means retry forever
    #[serde(rename = "max-timeout-retries", default)]
    pub max_timeout_retries: Option<u32>,

    #[serde(rename = "error-policy", default)]
    pub error_policy: ErrorPolicy,

    /// Retries of a failing page before it is skipped (retry-then-skip only)
    #[serde(rename = "max-error-retries", default = "default_max_error_retries")]
    pub max_error_retries: u32,

    /// Delay between retries of a failing page (milliseconds)
    #[serde(rename = "error-delay-ms", default = "default_error_delay_ms")]
    pub error_delay_ms: u64,

    /// Consecutive skipped pages after which the pass is abandoned
    #[serde(
        rename = "max-consecutive-skipped-pages",
        default = "default_max_consecutive_skipped_pages"
    )]
    pub max_consecutive_skipped_pages: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_cooldown_secs: default_timeout_cooldown_secs(),
            max_timeout_retries: None,
            error_policy: ErrorPolicy::default(),
            max_error_retries: default_max_error_retries(),
            error_delay_ms: default_error_delay_ms(),
            max_consecutive_skipped_pages: default_max_consecutive_skipped_pages(),
        }
    }
}

/// Marker strings the extractor compares against
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Elapsed label of a posting that no longer accepts applications
    #[serde(rename = "expiry-marker", default = "default_expiry_marker")]
    pub expiry_marker: String,

    /// Third overview tag of a company that is currently hiring
    #[serde(rename = "hiring-marker", default = "default_hiring_marker")]
    pub hiring_marker: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            expiry_marker: default_expiry_marker(),
            hiring_marker: default_hiring_marker(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON snapshot file
    #[serde(rename = "snapshot-path", default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Overwrite the snapshot file even when a pass found nothing
    #[serde(rename = "write-empty", default)]
    pub write_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            write_empty: false,
        }
    }
}

fn default_first_page() -> u32 {
    1
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    format!("company-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_cooldown_secs() -> u64 {
    300
}

fn default_max_error_retries() -> u32 {
    3
}

fn default_error_delay_ms() -> u64 {
    1_000
}

fn default_max_consecutive_skipped_pages() -> u32 {
    10
}

fn default_expiry_marker() -> String {
    crate::extract::DEFAULT_EXPIRY_MARKER.to_string()
}

fn default_hiring_marker() -> String {
    crate::extract::DEFAULT_HIRING_MARKER.to_string()
}

fn default_snapshot_path() -> String {
    "./static/data.json".to_string()
}
