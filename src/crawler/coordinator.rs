//! Crawl coordinator - main orchestration logic
//!
//! This module drives the whole run: discover the page count, walk index
//! pages in ascending order, fetch each page's listings in page order, and
//! append every completed page batch to the output sink. Politeness pauses
//! separate every two outbound requests. A connectivity failure stops the
//! run after persisting everything collected so far; records already
//! written are never lost.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::index::{count_pages, list_item_urls};
use crate::crawler::listing::{fetch_listing, ListingRecord};
use crate::crawler::throttle::Throttle;
use crate::extract::ExtractorRegistry;
use crate::output::CsvSink;
use crate::HarvestError;
use reqwest::Client;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Why a run stopped before exhausting the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A listing fetch failed at the network level.
    Connectivity(String),

    /// An index page could not be fetched.
    IndexUnavailable { page: u32 },

    /// Cancellation was requested.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Connectivity(message) => write!(f, "connectivity failure: {}", message),
            StopReason::IndexUnavailable { page } => {
                write!(f, "index page {} unavailable", page)
            }
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Terminal state of a run.
///
/// Both variants are successful exits: the sink is left valid and readable
/// either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The index was exhausted (or a page legitimately had no items).
    Done,

    /// The run halted early; everything collected so far is persisted.
    Stopped(StopReason),
}

impl CrawlOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, CrawlOutcome::Done)
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlOutcome::Done => write!(f, "done"),
            CrawlOutcome::Stopped(reason) => write!(f, "stopped ({})", reason),
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub outcome: CrawlOutcome,
    pub pages_visited: u32,
    pub records_written: usize,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    registry: ExtractorRegistry,
    sink: CsvSink,
    throttle: Throttle,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// Builds the shared HTTP client from the configured headers and proxy,
    /// the output sink for the configured field selection, the extractor
    /// registry, and the politeness throttle. The configuration is owned by
    /// the coordinator and immutable for the run's duration.
    pub fn new(config: Config, cancel: CancellationToken) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;

        let header: Vec<String> = config
            .selected_fields()
            .iter()
            .map(|f| f.to_string())
            .collect();
        let sink = CsvSink::new(&config.output.path, config.output.delimiter_byte(), header);

        let throttle = Throttle::new(&config.throttle);
        let registry = ExtractorRegistry::new();

        Ok(Self {
            config,
            client,
            registry,
            sink,
            throttle,
            cancel,
        })
    }

    /// Runs the crawl to one of its terminal states
    ///
    /// # Errors
    ///
    /// Returns `Err` only for startup-fatal conditions (page count
    /// indeterminate, sink I/O failure). Mid-run connectivity failures and
    /// cancellation are NOT errors: they produce a `Stopped` outcome with
    /// all collected records already persisted.
    pub async fn run(&mut self) -> Result<CrawlSummary, HarvestError> {
        let total_pages = count_pages(&self.client, &self.config).await?;
        tracing::info!(total_pages, "Discovered page count");

        let mut summary = CrawlSummary {
            outcome: CrawlOutcome::Done,
            pages_visited: 0,
            records_written: 0,
        };
        let start_time = std::time::Instant::now();

        for page in 1..=total_pages {
            if self.cancel.is_cancelled() {
                tracing::info!(page, "Cancellation requested, stopping before next index page");
                summary.outcome = CrawlOutcome::Stopped(StopReason::Cancelled);
                return Ok(summary);
            }

            if page > 1 {
                self.throttle.pause().await;
            }

            tracing::info!(page, total_pages, "Processing index page");
            let hrefs = match list_item_urls(&self.client, &self.config, page).await {
                Ok(hrefs) => hrefs,
                Err(e) => {
                    tracing::warn!(page, error = %e, "Index page unavailable, stopping run");
                    summary.outcome =
                        CrawlOutcome::Stopped(StopReason::IndexUnavailable { page });
                    return Ok(summary);
                }
            };
            summary.pages_visited += 1;

            if hrefs.is_empty() {
                tracing::info!(page, "Index page has no items, treating as end of data");
                break;
            }
            tracing::info!(page, count = hrefs.len(), "Found item links");

            let (batch, stop) = self.fetch_page_items(&hrefs).await;

            // Persist before acting on any stop condition: a partial batch
            // from a failed page is still data.
            if !batch.is_empty() {
                let written = self.sink.append_batch(&batch)?;
                summary.records_written += written;
                tracing::info!(
                    page,
                    written,
                    total = summary.records_written,
                    "Persisted page batch"
                );
            }

            if let Some(reason) = stop {
                summary.outcome = CrawlOutcome::Stopped(reason);
                return Ok(summary);
            }
        }

        tracing::info!(
            pages = summary.pages_visited,
            records = summary.records_written,
            elapsed = ?start_time.elapsed(),
            "Crawl complete"
        );
        Ok(summary)
    }

    /// Fetches one index page's listings in page order.
    ///
    /// Returns the records collected up to the first fatal condition, plus
    /// the stop reason if one occurred. Remaining URLs after a failure are
    /// not attempted.
    async fn fetch_page_items(
        &self,
        hrefs: &[String],
    ) -> (Vec<ListingRecord>, Option<StopReason>) {
        let mut batch = Vec::with_capacity(hrefs.len());

        for (position, href) in hrefs.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping before next listing");
                return (batch, Some(StopReason::Cancelled));
            }

            if position > 0 {
                self.throttle.pause().await;
            }

            match fetch_listing(&self.client, &self.config, &self.registry, href).await {
                Ok(record) => batch.push(record),
                Err(e) => {
                    tracing::error!(href, error = %e, "Listing fetch failed, stopping run");
                    return (batch, Some(StopReason::Connectivity(e.to_string())));
                }
            }
        }

        (batch, None)
    }
}
