//! Best-effort per-article enrichment: open-graph image extraction and
//! title translation.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;

use crate::error::FeedError;
use crate::translate::{TranslateClient, TranslateError};
use crate::types::{EnrichedArticle, FreshEntry};

/// Enriches filtered articles concurrently with independent failure
/// isolation: a failed page fetch leaves the image empty, a failed
/// translation leaves the original title, and neither cancels sibling
/// articles.
pub struct Enricher {
    page_client: Client,
    translator: TranslateClient,
    max_concurrent: usize,
}

impl Enricher {
    /// Creates an `Enricher` whose page fetches and translation calls share
    /// one client with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        translate_url: &str,
        translate_target: &str,
        max_concurrent: usize,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        let translator = TranslateClient::new(client.clone(), translate_url, translate_target);
        Ok(Self {
            page_client: client,
            translator,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Enrich every article, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::TranslatorUnreachable`] when every article's
    /// translation call failed in transit, meaning the endpoint itself is
    /// down. Per-article failures of either augmentation degrade softly.
    pub async fn enrich_all(
        &self,
        entries: Vec<FreshEntry>,
    ) -> Result<Vec<EnrichedArticle>, FeedError> {
        let total = entries.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let outcomes: Vec<(EnrichedArticle, bool)> = stream::iter(entries)
            .map(|entry| self.enrich_one(entry))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let transport_failures = outcomes.iter().filter(|(_, failed)| *failed).count();
        if transport_failures == total {
            return Err(FeedError::TranslatorUnreachable {
                failed: transport_failures,
                total,
            });
        }

        Ok(outcomes.into_iter().map(|(article, _)| article).collect())
    }

    /// Run both augmentations for one article and report whether its
    /// translation failed at the transport level.
    async fn enrich_one(&self, entry: FreshEntry) -> (EnrichedArticle, bool) {
        let (image_url, translated) = tokio::join!(
            self.fetch_og_image(&entry.url),
            self.translator.translate(&entry.title)
        );

        let (title, transport_failed) = match translated {
            Ok(title) => (title, false),
            Err(e @ TranslateError::Transport(_)) => {
                tracing::warn!(url = %entry.url, error = %e, "translation failed in transit; keeping original title");
                (entry.title.clone(), true)
            }
            Err(e) => {
                tracing::warn!(url = %entry.url, error = %e, "translation failed; keeping original title");
                (entry.title.clone(), false)
            }
        };

        let article = EnrichedArticle {
            title: title.to_uppercase(),
            original_title: entry.title,
            url: entry.url,
            published_at: entry.published_at,
            description: entry.description,
            source_name: entry.source_name,
            category: entry.category,
            image_url,
        };
        (article, transport_failed)
    }

    /// Fetch the article page and extract its `og:image` URL.
    ///
    /// Any failure (timeout, bad status, unreadable body, no matching meta
    /// tag) yields an empty string.
    async fn fetch_og_image(&self, url: &str) -> String {
        let response = match self.page_client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "article page fetch returned non-success; no image");
                return String::new();
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "article page fetch failed; no image");
                return String::new();
            }
        };
        match response.text().await {
            Ok(html) => extract_og_image(&html).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(url, error = %e, "article page body unreadable; no image");
                String::new()
            }
        }
    }
}

/// Extract the `og:image` meta content from an HTML document.
///
/// Accepts both attribute orders: `property` before `content` and the
/// reverse, as real pages emit either.
fn extract_og_image(html: &str) -> Option<String> {
    let property_first =
        Regex::new(r#"(?i)<meta[^>]*property\s*=\s*["']og:image["'][^>]*content\s*=\s*["']([^"']+)["']"#)
            .expect("valid og:image regex");
    if let Some(cap) = property_first.captures(html) {
        return cap.get(1).map(|m| m.as_str().trim().to_string());
    }

    let content_first =
        Regex::new(r#"(?i)<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:image["']"#)
            .expect("valid og:image regex");
    content_first
        .captures(html)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_property_before_content() {
        let html = r#"<head><meta property="og:image" content="https://cdn.example.com/a.jpg"/></head>"#;
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn extracts_content_before_property() {
        let html = r#"<meta content="https://cdn.example.com/b.png" property="og:image">"#;
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://cdn.example.com/b.png")
        );
    }

    #[test]
    fn tolerates_extra_attributes_and_case() {
        let html = r#"<META data-reactid="7" PROPERTY='og:image' CONTENT='https://cdn.example.com/c.webp'>"#;
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://cdn.example.com/c.webp")
        );
    }

    #[test]
    fn missing_tag_yields_none() {
        assert!(extract_og_image("<html><head><title>x</title></head></html>").is_none());
    }
}
