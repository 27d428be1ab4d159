//! Crawler module for index walking and listing extraction
//!
//! This module contains the core crawling logic:
//! - HTTP client construction and page fetching
//! - Index pagination (page count discovery, item URL listing)
//! - Per-listing field extraction
//! - Politeness throttling
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod index;
mod listing;
mod throttle;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlSummary, StopReason};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use index::{count_pages, list_item_urls};
pub use listing::{extract_record, fetch_listing, resolve_item_url, ListingRecord};
pub use throttle::Throttle;

use crate::config::Config;
use crate::HarvestError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl with a private cancellation token
///
/// Convenience entry point for callers that don't need external
/// cancellation. For cancellable runs, construct a [`Coordinator`] with
/// your own token.
pub async fn crawl(config: Config) -> Result<CrawlSummary, HarvestError> {
    let mut coordinator = Coordinator::new(config, CancellationToken::new())?;
    coordinator.run().await
}
