//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a fake classifieds site and drive
//! the full crawl cycle end-to-end: page count discovery, index walking,
//! per-listing extraction, and incremental CSV persistence.

use listhawk::config::{
    Config, FieldEntry, HttpConfig, IndexConfig, OutputConfig, ThrottleConfig,
};
use listhawk::crawler::{Coordinator, CrawlOutcome, StopReason};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(index_url: &str, output_path: &Path, fields: &[&str]) -> Config {
    Config {
        index: IndexConfig {
            url: index_url.to_string(),
            page_param: "p".to_string(),
        },
        output: OutputConfig {
            path: output_path.to_string_lossy().to_string(),
            delimiter: ";".to_string(),
        },
        http: HttpConfig::default(),
        throttle: ThrottleConfig {
            // No politeness pauses in tests
            base_delay_ms: 0,
            jitter_min_ms: 0,
            jitter_max_ms: 0,
        },
        fields: fields
            .iter()
            .map(|name| FieldEntry {
                name: name.to_string(),
                include: true,
            })
            .collect(),
    }
}

/// Index page body: pagination control plus listing blocks
fn index_page(max_page: u32, hrefs: &[&str]) -> String {
    let pagination = format!(
        r#"<div class="js-pages pagination-pagination-Oz4Ri">
            <span>1</span><span>{}</span><span>След.</span>
        </div>"#,
        max_page
    );

    let blocks: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="iva-item-content-OWwoq">
                    <div class="iva-item-titleStep-zichc">
                        <a href="{}">объявление</a>
                    </div>
                </div>"#,
                href
            )
        })
        .collect();

    format!("<html><body>{}{}</body></html>", pagination, blocks)
}

/// Item page body with a price, an address, a parameter list and a floor
/// fraction
fn item_page(price: &str, rooms: &str, floor: &str, total_floors: &str) -> String {
    format!(
        r#"<html><body>
            <span>2-к. квартира, 45 м², {floor}/{total_floors} этаж</span>
            <span itemprop="price" content="{price}">{price} ₽</span>
            <span class="style-item-address__string-wt61A">г. Москва
ул. Ленина, д. 5</span>
            <ul class="params-paramsList-_awNW">
                <li><span class="styles-module-noAccent-l9CMS">Количество комнат</span><span>: </span>{rooms}</li>
                <li><span class="styles-module-noAccent-l9CMS">Ремонт</span><span>: </span>евро</li>
            </ul>
        </body></html>"#,
    )
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page 1 yields three items, page 2 yields none.
    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(
            2,
            &["/item/1", "/item/2", "/item/3"],
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(2, &[])))
        .mount(&mock_server)
        .await;

    // Bare index request (no page parameter) serves the page count.
    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(2, &[])))
        .mount(&mock_server)
        .await;

    for (item, price, rooms) in [("1", "8500000", "3"), ("2", "6200000", "2"), ("3", "4100000", "1")]
    {
        Mock::given(method("GET"))
            .and(path(format!("/item/{}", item)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(item_page(price, rooms, "5", "12")),
            )
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "number of rooms", "apartment floor", "number of floors", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(summary.outcome.is_done());
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.pages_visited, 2);

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4, "header plus three records");
    assert_eq!(
        lines[0],
        "price;number of rooms;apartment floor;number of floors;link"
    );
    assert_eq!(
        lines[1],
        format!("8500000;3;5;12;{}/item/1", base_url)
    );
    assert_eq!(
        lines[3],
        format!("4100000;1;5;12;{}/item/3", base_url)
    );
}

#[tokio::test]
async fn test_connectivity_failure_preserves_partial_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Item 2 points at a dead endpoint: connection refused mid-page.
    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(
            1,
            &["/item/1", "http://127.0.0.1:1/item/2", "/item/3"],
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &[])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_page("8500000", "3", "5", "12")))
        .mount(&mock_server)
        .await;

    // Item 3 must never be attempted once item 2 fails.
    Mock::given(method("GET"))
        .and(path("/item/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_page("1", "1", "1", "1")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(matches!(
        summary.outcome,
        CrawlOutcome::Stopped(StopReason::Connectivity(_))
    ));
    assert_eq!(summary.records_written, 1);

    // The record fetched before the failure is persisted, header intact.
    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "price;link");
    assert_eq!(lines[1], format!("8500000;{}/item/1", base_url));
}

#[tokio::test]
async fn test_page_count_unavailable_is_startup_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No pagination control anywhere on the index.
    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Ничего не найдено</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(listhawk::HarvestError::PageCountUnavailable(_))
    ));

    // Startup-fatal means no output at all.
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_empty_first_page_ends_cleanly() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The pagination claims three pages, but page 1 has no listing blocks.
    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(3, &[])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(3, &[])))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(summary.outcome.is_done());
    assert_eq!(summary.records_written, 0);
    assert_eq!(summary.pages_visited, 1);
    assert!(!output_path.exists(), "no records means no output file");
}

#[tokio::test]
async fn test_non_success_item_status_still_extracts_body() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &["/item/1"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &[])))
        .mount(&mock_server)
        .await;

    // A 404 whose body still carries the listing markup: the record is
    // extracted from whatever came back.
    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string(item_page("7000000", "2", "3", "9")))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(summary.outcome.is_done());
    assert_eq!(summary.records_written, 1);

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    assert_eq!(
        content.lines().nth(1),
        Some(format!("7000000;{}/item/1", base_url).as_str())
    );
}

#[tokio::test]
async fn test_cancelled_before_start_writes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(5, &[])))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "link"],
    );

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut coordinator =
        Coordinator::new(config, cancel).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(matches!(
        summary.outcome,
        CrawlOutcome::Stopped(StopReason::Cancelled)
    ));
    assert_eq!(summary.records_written, 0);
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_crawl_entry_point_single_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &["/item/1"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &[])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_page("8500000", "3", "5", "12")))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["physical address", "price", "link"],
    );

    let summary = listhawk::crawler::crawl(config).await.expect("Crawl failed");

    assert!(summary.outcome.is_done());
    assert_eq!(summary.records_written, 1);

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "physical address;price;link");
    assert_eq!(
        lines[1],
        format!("г. Москва|ул. Ленина, д. 5;8500000;{}/item/1", base_url)
    );
}

#[tokio::test]
async fn test_unknown_field_degrades_to_empty_column() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &["/item/1"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kvartiry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(1, &[])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_page("8500000", "3", "5", "12")))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("listings.csv");
    let config = create_test_config(
        &format!("{}/kvartiry", base_url),
        &output_path,
        &["price", "number of chimneys", "link"],
    );

    let mut coordinator =
        Coordinator::new(config, CancellationToken::new()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(summary.outcome.is_done());

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "price;number of chimneys;link");
    assert_eq!(
        lines[1],
        format!("8500000;;{}/item/1", base_url)
    );
}
