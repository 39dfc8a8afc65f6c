//! Integration tests for `Enricher::enrich_all`.
//!
//! The article pages and the translation endpoint are both served by a
//! local `wiremock` server; per-article failures must degrade softly and
//! only a fully unreachable translation endpoint may fail the batch.

use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pulse_feed::{Enricher, FeedError, FreshEntry};

fn entry(title: &str, url: &str) -> FreshEntry {
    let published_at: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-08-03T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    FreshEntry {
        title: title.to_string(),
        url: url.to_string(),
        published_at,
        description: "<p>body</p>".to_string(),
        source_name: "TechCrunch".to_string(),
        category: "Tech".to_string(),
    }
}

fn enricher_against(server: &MockServer) -> Enricher {
    Enricher::new(2, "aipulse-test/0.1", &server.uri(), "it", 4)
        .expect("failed to build test Enricher")
}

async fn mount_translation(server: &MockServer, translated: &str) {
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translatedText": translated })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn extracts_og_image_and_translates_title() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta property="og:image" content="https://cdn.example.com/hero.jpg"/></head></html>"#,
        ))
        .mount(&server)
        .await;
    mount_translation(&server, "Il titolo tradotto").await;

    let articles = enricher_against(&server)
        .enrich_all(vec![entry("The title", &format!("{}/article", server.uri()))])
        .await
        .expect("enrichment");

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].image_url, "https://cdn.example.com/hero.jpg");
    assert_eq!(articles[0].title, "IL TITOLO TRADOTTO");
    assert_eq!(articles[0].original_title, "The title");
}

#[tokio::test]
async fn accepts_reversed_meta_attribute_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reversed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<head><meta content="https://cdn.example.com/rev.png" property="og:image"></head>"#,
        ))
        .mount(&server)
        .await;
    mount_translation(&server, "Titolo").await;

    let articles = enricher_against(&server)
        .enrich_all(vec![entry("Title", &format!("{}/reversed", server.uri()))])
        .await
        .expect("enrichment");

    assert_eq!(articles[0].image_url, "https://cdn.example.com/rev.png");
}

#[tokio::test]
async fn failed_page_fetch_leaves_image_empty_without_touching_siblings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/with-image"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<meta property="og:image" content="https://cdn.example.com/ok.jpg"/>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_translation(&server, "Titolo").await;

    let articles = enricher_against(&server)
        .enrich_all(vec![
            entry("First", &format!("{}/with-image", server.uri())),
            entry("Second", &format!("{}/missing", server.uri())),
        ])
        .await
        .expect("enrichment");

    assert_eq!(articles[0].image_url, "https://cdn.example.com/ok.jpg");
    assert_eq!(articles[1].image_url, "");
}

#[tokio::test]
async fn translation_status_failure_falls_back_to_original_title() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let articles = enricher_against(&server)
        .enrich_all(vec![entry(
            "Original headline",
            &format!("{}/page", server.uri()),
        )])
        .await
        .expect("a status failure is soft, not a batch error");

    assert_eq!(articles[0].title, "ORIGINAL HEADLINE");
    assert_eq!(articles[0].original_title, "Original headline");
}

#[tokio::test]
async fn one_failed_translation_does_not_affect_siblings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({ "q": "Good headline" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translatedText": "Buon titolo" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({ "q": "Bad headline" })))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let articles = enricher_against(&server)
        .enrich_all(vec![
            entry("Good headline", &format!("{}/g", server.uri())),
            entry("Bad headline", &format!("{}/b", server.uri())),
        ])
        .await
        .expect("sibling isolation");

    assert_eq!(articles[0].title, "BUON TITOLO");
    assert_eq!(articles[1].title, "BAD HEADLINE");
}

#[tokio::test]
async fn unreachable_translation_endpoint_fails_the_batch() {
    let pages = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&pages)
        .await;

    // Nothing listens on port 1; every translation call fails in transit.
    let enricher = Enricher::new(2, "aipulse-test/0.1", "http://127.0.0.1:1", "it", 4)
        .expect("failed to build test Enricher");

    let result = enricher
        .enrich_all(vec![
            entry("One", &format!("{}/1", pages.uri())),
            entry("Two", &format!("{}/2", pages.uri())),
        ])
        .await;

    assert!(
        matches!(
            result,
            Err(FeedError::TranslatorUnreachable { failed: 2, total: 2 })
        ),
        "expected TranslatorUnreachable, got: {result:?}"
    );
}

#[tokio::test]
async fn output_preserves_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    mount_translation(&server, "Tradotto").await;

    let entries: Vec<FreshEntry> = (0..6)
        .map(|i| entry(&format!("Headline {i}"), &format!("{}/{i}", server.uri())))
        .collect();

    let articles = enricher_against(&server)
        .enrich_all(entries)
        .await
        .expect("enrichment");

    let originals: Vec<&str> = articles
        .iter()
        .map(|a| a.original_title.as_str())
        .collect();
    assert_eq!(
        originals,
        vec![
            "Headline 0",
            "Headline 1",
            "Headline 2",
            "Headline 3",
            "Headline 4",
            "Headline 5"
        ]
    );
}
