use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::article_id;
use crate::text::{strip_html, truncate_chars, SUMMARY_STORED_MAX};

/// An article as extracted directly from one feed document.
///
/// `published_at` keeps the feed-native date string; it may not parse.
/// The parser guarantees `title` and `url` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub title: String,
    pub url: String,
    pub published_at: String,
    pub description: String,
    pub source_name: String,
    pub category: String,
}

/// A feed entry whose publish date parsed, ready for enrichment.
#[derive(Debug, Clone)]
pub struct FreshEntry {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub description: String,
    pub source_name: String,
    pub category: String,
}

/// A [`FreshEntry`] after best-effort enrichment.
///
/// `title` is the display form (translated then uppercased); `image_url` is
/// empty when open-graph extraction failed.
#[derive(Debug, Clone)]
pub struct EnrichedArticle {
    pub title: String,
    pub original_title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub description: String,
    pub source_name: String,
    pub category: String,
    pub image_url: String,
}

/// The canonical persisted article shape, as written to and read from the
/// durable store. Serialized camelCase for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub original_title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl ArticleRecord {
    /// Convert an enriched article into its persisted shape: stable id derived
    /// from the canonical URL, summary markup-stripped and capped for storage.
    #[must_use]
    pub fn from_enriched(article: EnrichedArticle) -> Self {
        let summary = truncate_chars(&strip_html(&article.description), SUMMARY_STORED_MAX);
        let image_url = if article.image_url.is_empty() {
            None
        } else {
            Some(article.image_url)
        };
        Self {
            id: article_id(&article.url),
            title: article.title,
            original_title: article.original_title,
            summary,
            source: article.source_name,
            url: article.url,
            image_url,
            published_at: article.published_at,
            category: article.category,
            created_at: Utc::now(),
        }
    }
}

/// Display urgency tag assigned by position in the live-feed projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Normal,
}

/// One row of the live-feed projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedItem {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub color: String,
    pub source: String,
}

/// The UI-facing aggregate: three views over one ordered article list plus a
/// total count. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedProjection {
    pub featured: Vec<ArticleRecord>,
    pub latest_drops: Vec<ArticleRecord>,
    pub live_feed: Vec<LiveFeedItem>,
    pub total_articles: usize,
}

impl FeedProjection {
    /// The projection of an empty article list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            featured: Vec::new(),
            latest_drops: Vec::new(),
            live_feed: Vec::new(),
            total_articles: 0,
        }
    }
}
