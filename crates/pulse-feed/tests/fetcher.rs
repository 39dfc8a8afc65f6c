//! Integration tests for `FeedFetcher::fetch_all`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. The scenarios cover per-source failure
//! isolation, ordering, and the all-sources-failed batch error.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pulse_core::FeedSource;
use pulse_feed::{FeedError, FeedFetcher};

const TEST_UA: &str = "aipulse-test/0.1";

fn test_fetcher() -> FeedFetcher {
    FeedFetcher::new(1, TEST_UA, 8).expect("failed to build test FeedFetcher")
}

fn source(server: &MockServer, name: &str, feed_path: &str) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        url: format!("{}{feed_path}", server.uri()),
        category: "Tech".to_string(),
    }
}

fn rss_with_items(items: &[(&str, &str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, url, date)| {
            format!(
                "<item><title>{title}</title><link>{url}</link><pubDate>{date}</pubDate></item>"
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel>{body}</channel></rss>"#)
}

#[tokio::test]
async fn combines_entries_and_isolates_failing_sources() {
    let server = MockServer::start().await;

    // Feed A: three valid entries.
    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[
            (
                "A one",
                "https://example.com/a1",
                "Mon, 03 Aug 2026 10:00:00 +0000",
            ),
            (
                "A two",
                "https://example.com/a2",
                "Mon, 03 Aug 2026 09:00:00 +0000",
            ),
            (
                "A three",
                "https://example.com/a3",
                "Mon, 03 Aug 2026 08:00:00 +0000",
            ),
        ])))
        .mount(&server)
        .await;

    // Feed B: hangs past the client timeout.
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rss_with_items(&[]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    // Feed C: malformed XML.
    Mock::given(method("GET"))
        .and(path("/c.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel><item><title>Broken"))
        .mount(&server)
        .await;

    let sources = vec![
        source(&server, "Feed A", "/a.xml"),
        source(&server, "Feed B", "/b.xml"),
        source(&server, "Feed C", "/c.xml"),
    ];

    let entries = test_fetcher()
        .fetch_all(&sources)
        .await
        .expect("batch must survive individual source failures");

    assert_eq!(entries.len(), 3, "only feed A contributes entries");
    assert!(entries.iter().all(|e| e.source_name == "Feed A"));
}

#[tokio::test]
async fn entries_are_sorted_most_recent_first_across_sources() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[(
            "Older",
            "https://example.com/older",
            "Sun, 02 Aug 2026 10:00:00 +0000",
        )])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[(
            "Newer",
            "https://example.com/newer",
            "Mon, 03 Aug 2026 10:00:00 +0000",
        )])))
        .mount(&server)
        .await;

    let sources = vec![
        source(&server, "Old Feed", "/old.xml"),
        source(&server, "New Feed", "/new.xml"),
    ];

    let entries = test_fetcher().fetch_all(&sources).await.expect("fetch");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].url, "https://example.com/newer");
    assert_eq!(entries[1].url, "https://example.com/older");
}

#[tokio::test]
async fn non_success_status_contributes_zero_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[(
            "Kept",
            "https://example.com/kept",
            "Mon, 03 Aug 2026 10:00:00 +0000",
        )])))
        .mount(&server)
        .await;

    let sources = vec![
        source(&server, "Gone", "/gone.xml"),
        source(&server, "Ok", "/ok.xml"),
    ];

    let entries = test_fetcher().fetch_all(&sources).await.expect("fetch");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, "https://example.com/kept");
}

#[tokio::test]
async fn all_sources_failing_is_a_batch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sources = vec![
        source(&server, "Down A", "/a.xml"),
        source(&server, "Down B", "/b.xml"),
    ];

    let result = test_fetcher().fetch_all(&sources).await;
    assert!(
        matches!(result, Err(FeedError::AllSourcesFailed(2))),
        "expected AllSourcesFailed(2), got: {result:?}"
    );
}

#[tokio::test]
async fn reachable_but_empty_sources_are_not_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[])))
        .mount(&server)
        .await;

    let sources = vec![source(&server, "Quiet", "/quiet.xml")];

    let entries = test_fetcher().fetch_all(&sources).await.expect("fetch");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn requests_carry_the_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", TEST_UA))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[(
            "UA ok",
            "https://example.com/ua",
            "Mon, 03 Aug 2026 10:00:00 +0000",
        )])))
        .mount(&server)
        .await;

    let sources = vec![source(&server, "UA Feed", "/ua.xml")];

    let entries = test_fetcher().fetch_all(&sources).await.expect("fetch");
    assert_eq!(
        entries.len(),
        1,
        "mock only matches when the user-agent header is present"
    );
}
