//! Concurrent multi-source feed retrieval.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use pulse_core::FeedSource;

use crate::error::FeedError;
use crate::parser::parse_feed;
use crate::recency::parse_published;
use crate::types::RawFeedEntry;

/// HTTP client for the configured feed endpoints.
///
/// Each source is fetched independently with a shared request timeout; a
/// source that times out, returns a non-success status, or fails to parse
/// contributes zero entries and never aborts the batch.
pub struct FeedFetcher {
    client: Client,
    max_concurrent: usize,
}

impl FeedFetcher {
    /// Creates a `FeedFetcher` with the configured timeout, `User-Agent`, and
    /// concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_concurrent: usize,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Fetch every registered source and combine the parsed entries, sorted
    /// descending by parsed publish date (unparsable dates last).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::AllSourcesFailed`] only when every source failed
    /// at the transport or status level. A reachable source with an empty or
    /// unparsable body counts as zero entries, not a failure.
    pub async fn fetch_all(&self, sources: &[FeedSource]) -> Result<Vec<RawFeedEntry>, FeedError> {
        let pending: Vec<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let source = source.clone();
                let client = self.client.clone();
                async move { (index, Self::fetch_one(&client, &source).await) }
            })
            .collect();
        let results: Vec<(usize, Result<Vec<RawFeedEntry>, FeedError>)> = stream::iter(pending)
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut entries: Vec<RawFeedEntry> = Vec::new();
        let mut failed_sources = 0usize;

        for (index, outcome) in results {
            let source = &sources[index];
            match outcome {
                Ok(parsed) => {
                    tracing::debug!(
                        source = %source.name,
                        count = parsed.len(),
                        "collected feed entries"
                    );
                    entries.extend(parsed);
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        url = %source.url,
                        error = %e,
                        "feed fetch failed; source contributes zero entries"
                    );
                    failed_sources += 1;
                }
            }
        }

        if !sources.is_empty() && failed_sources == sources.len() {
            return Err(FeedError::AllSourcesFailed(failed_sources));
        }

        let mut keyed: Vec<(Option<chrono::DateTime<chrono::Utc>>, RawFeedEntry)> = entries
            .into_iter()
            .map(|entry| (parse_published(&entry.published_at), entry))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Fetch and parse a single feed document.
    async fn fetch_one(
        client: &Client,
        source: &FeedSource,
    ) -> Result<Vec<RawFeedEntry>, FeedError> {
        let response = client.get(&source.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                feed: source.name.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        if !body.contains("<rss") && !body.contains("<feed") {
            return Ok(Vec::new());
        }
        Ok(parse_feed(&body, source))
    }
}
