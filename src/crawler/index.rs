//! Index page fetcher
//!
//! Walks the paginated listing index: discovers the total page count from
//! the pagination control and extracts the ordered list of item links from
//! each index page.

use crate::config::Config;
use crate::crawler::fetcher::fetch_page;
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};

/// The pagination control on the base index page.
const PAGINATION_SELECTOR: &str = "div.js-pages.pagination-pagination-Oz4Ri";

/// One listing block on an index page; each block carries one item link.
const ITEM_BLOCK_SELECTOR: &str = "div.iva-item-content-OWwoq";

/// The title element inside a listing block, wrapping the item anchor.
const ITEM_TITLE_SELECTOR: &str = "div.iva-item-titleStep-zichc";

/// Determines the number of pages in the listing index
///
/// Issues one GET to the base index URL and reads the numeric span texts of
/// the pagination control, returning the maximum. Any failure here
/// (connectivity, a non-2xx status, or a missing/malformed pagination
/// control) makes the whole run unstartable, so everything maps to
/// `HarvestError::PageCountUnavailable` before any item I/O happens.
pub async fn count_pages(client: &Client, config: &Config) -> Result<u32, HarvestError> {
    let page = fetch_page(client, &config.index.url, &[])
        .await
        .map_err(|e| HarvestError::PageCountUnavailable(e.to_string()))?;

    if !page.is_success() {
        return Err(HarvestError::PageCountUnavailable(format!(
            "index returned HTTP {}",
            page.status
        )));
    }

    let doc = Html::parse_document(&page.body);
    parse_page_count(&doc).ok_or_else(|| {
        HarvestError::PageCountUnavailable("no page numbers found in pagination control".to_string())
    })
}

/// Reads the maximum page number out of the pagination control.
fn parse_page_count(doc: &Html) -> Option<u32> {
    let pagination_selector = Selector::parse(PAGINATION_SELECTOR).ok()?;
    let span_selector = Selector::parse("span").ok()?;

    let pagination = doc.select(&pagination_selector).next()?;

    pagination
        .select(&span_selector)
        .filter_map(|span| {
            span.text()
                .collect::<String>()
                .trim()
                .parse::<u32>()
                .ok()
        })
        .max()
}

/// Lists the item URLs on one index page, in page order
///
/// Issues one GET with the configured page-number query parameter and
/// extracts the link of every listing block. A block without a link is
/// skipped with a diagnostic. A connectivity failure is returned as an
/// error; it is typed, so the caller can tell "the index is unreachable" apart
/// from "the index legitimately has no more items" (`Ok` with an empty
/// vector). Does not retry.
pub async fn list_item_urls(
    client: &Client,
    config: &Config,
    page_number: u32,
) -> Result<Vec<String>, HarvestError> {
    let query = [(config.index.page_param.as_str(), page_number.to_string())];
    let page = fetch_page(client, &config.index.url, &query).await?;

    if !page.is_success() {
        tracing::warn!(
            page = page_number,
            url = %page.final_url,
            status = page.status,
            "Index page returned non-success status"
        );
    }

    let doc = Html::parse_document(&page.body);
    Ok(parse_item_urls(&doc, page_number))
}

/// Extracts the ordered item hrefs from a parsed index page.
fn parse_item_urls(doc: &Html, page_number: u32) -> Vec<String> {
    let block_selector = match Selector::parse(ITEM_BLOCK_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let title_selector = match Selector::parse(ITEM_TITLE_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let anchor_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut urls = Vec::new();
    for block in doc.select(&block_selector) {
        let href = block
            .select(&title_selector)
            .next()
            .and_then(|title| title.select(&anchor_selector).next())
            .and_then(|anchor| anchor.value().attr("href"));

        match href {
            Some(href) => urls.push(href.to_string()),
            None => {
                tracing::debug!(page = page_number, "Listing block without an item link, skipping");
            }
        }
    }

    urls
}
