//! Listing fetcher
//!
//! Fetches one item page and runs every selected field's extraction
//! strategy against the single parsed document, producing one ordered
//! record. Individual field failures degrade to absent values; only a
//! network-level failure propagates, because it means the run itself
//! should stop.

use crate::config::Config;
use crate::crawler::fetcher::fetch_page;
use crate::extract::{ExtractorRegistry, FieldValue};
use crate::HarvestError;
use reqwest::Client;
use scraper::Html;
use url::Url;

/// The field identifier that is satisfied by the item URL itself.
const LINK_FIELD: &str = "link";

/// One extracted listing: an ordered tuple of field values.
///
/// The record always has exactly one value per selected field, in the
/// configuration's declared order, regardless of how many extractions
/// actually found anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    values: Vec<FieldValue>,
}

impl ListingRecord {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves an item href against the index URL.
///
/// Item links on the index are site-relative; joining against the index
/// URL yields the fully qualified item URL. Absolute hrefs pass through
/// unchanged.
pub fn resolve_item_url(config: &Config, href: &str) -> Result<Url, HarvestError> {
    let base = Url::parse(&config.index.url)?;
    Ok(base.join(href)?)
}

/// Fetches one item page and extracts the selected fields
///
/// The document is fetched and parsed once; extractors never re-fetch. A
/// non-2xx status is logged but extraction still runs against whatever
/// body came back. The "link" field is satisfied by the resolved item URL
/// without touching the document.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - The crawl configuration (field selection order)
/// * `registry` - The extractor registry
/// * `href` - The item link as found on the index page
///
/// # Returns
///
/// * `Ok(ListingRecord)` - One value per selected field, in order
/// * `Err(HarvestError)` - Network-level failure; the run should stop
pub async fn fetch_listing(
    client: &Client,
    config: &Config,
    registry: &ExtractorRegistry,
    href: &str,
) -> Result<ListingRecord, HarvestError> {
    let item_url = resolve_item_url(config, href)?;
    tracing::info!(url = %item_url, "Fetching listing");

    let page = fetch_page(client, item_url.as_str(), &[]).await?;
    if !page.is_success() {
        tracing::warn!(
            url = %page.final_url,
            status = page.status,
            "Listing returned non-success status"
        );
    }

    let doc = Html::parse_document(&page.body);
    Ok(extract_record(config, registry, &doc, item_url.as_str()))
}

/// Runs the selected extractors over an already-parsed document.
pub fn extract_record(
    config: &Config,
    registry: &ExtractorRegistry,
    doc: &Html,
    item_url: &str,
) -> ListingRecord {
    let values = config
        .selected_fields()
        .iter()
        .map(|field| {
            if *field == LINK_FIELD {
                FieldValue::Present(item_url.to_string())
            } else {
                registry.resolve(field).extract(doc)
            }
        })
        .collect();

    ListingRecord::new(values)
}
