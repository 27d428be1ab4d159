//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from configured headers and proxy
//! - GET requests for index and item pages
//! - Error classification (connectivity failures are surfaced, status
//!   codes are left to the caller)

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// A fetched page body with its response metadata.
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Builds the HTTP client shared by all fetches for a run
///
/// The configured headers become default headers on every request; the
/// optional proxy applies to all traffic. The client is read-only after
/// construction, so a run never mutates shared session state mid-flight.
///
/// # Arguments
///
/// * `config` - The HTTP configuration (headers, optional proxy)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - A header or the proxy URL was unusable
pub fn build_http_client(config: &HttpConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| HarvestError::InvalidHeader {
                name: name.clone(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| HarvestError::InvalidHeader {
                name: name.clone(),
            })?;
        headers.insert(header_name, header_value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(&proxy.url).map_err(|e| HarvestError::InvalidProxy {
            url: proxy.url.clone(),
            message: e.to_string(),
        })?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Fetches a URL and returns its body with response metadata
///
/// Network-level failures (connection refused/reset, timeout) are returned
/// as errors; non-2xx status codes are NOT errors here. The caller decides
/// whether a status is fatal for its purpose.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<FetchedPage, HarvestError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| HarvestError::Http {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status().as_u16();
    let final_url = response.url().to_string();

    let body = response.text().await.map_err(|e| HarvestError::Http {
        url: url.to_string(),
        source: e,
    })?;

    Ok(FetchedPage {
        final_url,
        status,
        body,
    })
}
