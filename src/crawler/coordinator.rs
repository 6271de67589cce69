//! Crawler coordinator - main crawl pass orchestration logic
//!
//! This module contains the listing page loop that drives a pass:
//! - Fetching listing pages one at a time until an empty page is reached
//! - Retrying or skipping failed listing pages per the retry policy
//! - Fetching each company's job list and profile map
//! - Handing the finished snapshot to the sink
//!
//! Everything runs sequentially on the caller's task. The snapshot is owned by
//! the running pass and only leaves it through the sink.

use crate::config::{Config, SiteConfig};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::{FetchError, FetchedPage, PageFetcher, SessionFetcher};
use crate::extract::{Extractor, Markers};
use crate::model::{Organization, Snapshot};
use crate::output::{JsonFileSink, PassStats, PersistOutcome, SnapshotSink};
use crate::state::CrawlState;
use crate::url::{
    is_incomplete_profile, listing_page_url, organization_id, organization_jobs_url,
    organization_url,
};
use crate::HarvestError;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Everything a pass needs besides its fetcher and sink
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub site: SiteConfig,
    pub retry: RetryPolicy,
    pub markers: Markers,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site: config.site.clone(),
            retry: RetryPolicy::from(&config.retry),
            markers: Markers::from(&config.extract),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F, S> {
    settings: CrawlSettings,
    extractor: Extractor,
    fetcher: F,
    sink: S,
    cancel: CancellationToken,
    state: CrawlState,
    stats: PassStats,
}

/// Per-page failure bookkeeping, reset whenever the page number changes
#[derive(Debug, Default)]
struct Attempts {
    timeouts: u32,
    errors: u32,
    consecutive_skipped: u32,
}

impl<F: PageFetcher, S: SnapshotSink> Coordinator<F, S> {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The extractor selectors failed to compile
    pub fn new(settings: CrawlSettings, fetcher: F, sink: S) -> Result<Self, HarvestError> {
        let extractor = Extractor::new(settings.markers.clone())?;
        let state = CrawlState::initial(settings.site.first_page);

        Ok(Self {
            settings,
            extractor,
            fetcher,
            sink,
            cancel: CancellationToken::new(),
            state,
            stats: PassStats::new(),
        })
    }

    /// Stops the pass at the next fetch or delay once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs one complete crawl pass
    ///
    /// The pass ends when a listing page without company entries is fetched;
    /// the accumulated snapshot is then handed to the sink once. A persist
    /// failure is logged and leaves `PassStats::persisted` unset; a sink that
    /// kept its previous snapshot sets `PassStats::kept_previous` instead.
    ///
    /// # Errors
    ///
    /// * `HarvestError::Cancelled` - The cancellation token fired
    /// * `HarvestError::RetriesExhausted` - A bounded timeout retry budget ran out
    /// * `HarvestError::PagesAbandoned` - Too many consecutive listing pages were skipped
    ///
    /// No snapshot is persisted when the pass ends with an error.
    pub async fn run(&mut self) -> Result<PassStats, HarvestError> {
        let start_time = Instant::now();
        self.state = CrawlState::initial(self.settings.site.first_page);
        self.stats = PassStats::new();

        tracing::info!(
            "Starting crawl pass at listing page {}",
            self.settings.site.first_page
        );

        let mut snapshot = Snapshot::new();
        let mut pending: Vec<Organization> = Vec::new();
        let mut attempts = Attempts::default();
        let mut retry_delay = Duration::ZERO;

        loop {
            let state = self.state;
            match state {
                CrawlState::FetchingPage(page) => {
                    let url = listing_page_url(&self.settings.site, page);
                    tracing::info!("Fetching listing page {}: {}", page, url);

                    match self.fetch(&url).await? {
                        Ok(fetched) => {
                            attempts = Attempts::default();
                            self.stats.pages_fetched += 1;

                            pending = self.extractor.extract_listing(&fetched);
                            if pending.is_empty() {
                                tracing::info!("Listing page {} is empty, pass complete", page);
                                self.transition(CrawlState::Done)?;
                            } else {
                                tracing::info!(
                                    "Found {} companies on listing page {}",
                                    pending.len(),
                                    page
                                );
                                self.transition(CrawlState::ProcessingOrganizations(page))?;
                            }
                        }
                        Err(error) => {
                            let decision = if error.is_timeout() {
                                self.stats.timeouts += 1;
                                attempts.timeouts += 1;
                                self.settings.retry.on_timeout(attempts.timeouts)
                            } else {
                                self.stats.fetch_errors += 1;
                                attempts.errors += 1;
                                self.settings.retry.on_error(attempts.errors)
                            };

                            match decision {
                                RetryDecision::Retry(delay) => {
                                    tracing::warn!(
                                        "Listing page {} failed ({}), retrying in {:?}",
                                        page,
                                        error,
                                        delay
                                    );
                                    retry_delay = delay;
                                    self.transition(CrawlState::AwaitingRetry(page))?;
                                }
                                RetryDecision::Skip => {
                                    tracing::warn!(
                                        "Listing page {} failed ({}), skipping it",
                                        page,
                                        error
                                    );
                                    self.stats.pages_skipped += 1;
                                    let skipped = attempts.consecutive_skipped + 1;
                                    if self.settings.retry.skip_limit_reached(skipped) {
                                        return Err(HarvestError::PagesAbandoned { page, skipped });
                                    }
                                    attempts = Attempts {
                                        consecutive_skipped: skipped,
                                        ..Attempts::default()
                                    };
                                    self.transition(CrawlState::FetchingPage(page.saturating_add(1)))?;
                                }
                                RetryDecision::GiveUp => {
                                    tracing::error!(
                                        "Listing page {} failed ({}), giving up the pass",
                                        page,
                                        error
                                    );
                                    return Err(HarvestError::RetriesExhausted {
                                        page,
                                        attempts: attempts.timeouts.max(attempts.errors),
                                    });
                                }
                            }
                        }
                    }
                }

                CrawlState::AwaitingRetry(page) => {
                    self.sleep(retry_delay).await?;
                    self.transition(CrawlState::FetchingPage(page))?;
                }

                CrawlState::ProcessingOrganizations(page) => {
                    for organization in std::mem::take(&mut pending) {
                        if let Some(organization) = self.process_organization(organization).await? {
                            snapshot.push(organization);
                        }
                    }

                    tracing::info!(
                        "Finished listing page {}: {} companies kept so far",
                        page,
                        snapshot.len()
                    );
                    self.transition(CrawlState::FetchingPage(page.saturating_add(1)))?;
                }

                CrawlState::Done => break,
            }
        }

        match self.sink.persist(&snapshot) {
            Ok(PersistOutcome::Written) => self.stats.persisted = true,
            Ok(PersistOutcome::KeptPrevious) => self.stats.kept_previous = true,
            Err(e) => tracing::error!("Failed to persist snapshot: {}", e),
        }
        self.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl pass completed: {} companies, {} postings in {:?}",
            snapshot.len(),
            snapshot.posting_count(),
            self.stats.elapsed
        );

        Ok(self.stats.clone())
    }

    /// Completes one company entry with its postings and map token
    ///
    /// Returns `None` if the company does not belong in the snapshot.
    /// Detail fetch failures are not retried.
    async fn process_organization(
        &mut self,
        mut organization: Organization,
    ) -> Result<Option<Organization>, HarvestError> {
        self.stats.organizations_seen += 1;
        tracing::debug!("Processing company {}", organization.source_url);

        let id = organization_id(&organization.source_url);
        if id.is_empty() || is_incomplete_profile(&id) {
            tracing::debug!(
                "Skipping {}: incomplete profile",
                organization.source_url
            );
            self.stats.skipped_incomplete += 1;
            return Ok(None);
        }

        let jobs_url = organization_jobs_url(&self.settings.site, &id);
        let postings = match self.fetch(&jobs_url).await? {
            Ok(page) => self.extractor.extract_postings(&page),
            Err(e) => {
                tracing::warn!("Failed to fetch job list {}: {}", jobs_url, e);
                self.stats.fetch_errors += 1;
                Vec::new()
            }
        };

        if postings.is_empty() {
            tracing::debug!("Skipping {}: no open postings", organization.source_url);
            self.stats.skipped_no_postings += 1;
            return Ok(None);
        }

        let profile_url = organization_url(&self.settings.site, &id);
        let map_token = match self.fetch(&profile_url).await? {
            Ok(page) => self.extractor.extract_map_token(&page),
            Err(e) => {
                tracing::warn!("Failed to fetch profile {}: {}", profile_url, e);
                self.stats.fetch_errors += 1;
                String::new()
            }
        };

        if map_token.is_empty() {
            self.stats.map_tokens_missing += 1;
        }

        self.stats.organizations_kept += 1;
        self.stats.postings_kept += postings.len() as u32;

        organization.postings = postings;
        organization.map_token = map_token;
        Ok(Some(organization))
    }

    /// Fetches a URL unless the pass is cancelled first
    async fn fetch(&self, url: &str) -> Result<Result<FetchedPage, FetchError>, HarvestError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(HarvestError::Cancelled),
            result = self.fetcher.open(url) => Ok(result),
        }
    }

    /// Sleeps unless the pass is cancelled first
    async fn sleep(&self, delay: Duration) -> Result<(), HarvestError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(HarvestError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(&next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Runs one crawl pass against the live site and writes the JSON snapshot
///
/// # Example
///
/// ```no_run
/// use company_harvester::config::Config;
/// use company_harvester::crawler::run_pass;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_pass(&Config::default(), CancellationToken::new()).await?;
/// println!("{} companies kept", stats.organizations_kept);
/// # Ok(())
/// # }
/// ```
pub async fn run_pass(
    config: &Config,
    cancel: CancellationToken,
) -> Result<PassStats, HarvestError> {
    let fetcher = SessionFetcher::new(&config.fetcher);
    let sink = JsonFileSink::from_config(&config.output);
    let mut coordinator =
        Coordinator::new(CrawlSettings::from_config(config), fetcher, sink)?.with_cancellation(cancel);
    coordinator.run().await
}
