//! HTTP fetcher against a mock server.

use rental_scout::config::BrowserConfig;
use rental_scout::scrapers::{HttpFetcher, PageFetcher};
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&BrowserConfig::default()).expect("client builds")
}

#[tokio::test]
async fn navigate_then_read_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "3"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>page three</body></html>"),
        )
        .mount(&server)
        .await;

    let mut fetcher = fetcher();
    fetcher
        .navigate(&format!("{}/search?page=3", server.uri()))
        .await
        .unwrap();

    let html = fetcher.content().await.unwrap();
    assert!(html.contains("page three"));
}

#[tokio::test]
async fn error_status_is_a_navigation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut fetcher = fetcher();
    assert!(fetcher.navigate(&format!("{}/search?page=1", server.uri())).await.is_err());
    assert!(fetcher.content().await.is_err());
}

#[tokio::test]
async fn interactions_are_unsupported() {
    let mut fetcher = fetcher();
    assert!(fetcher.click("#next").await.is_err());
    assert!(fetcher
        .wait_until_clickable("#cookies", Duration::from_millis(10))
        .await
        .is_err());
    assert!(fetcher.close().await.is_ok());
    assert_eq!(fetcher.name(), "http");
}
