//! Ingestion pipeline for the AI Pulse dashboard.
//!
//! Fetches the configured RSS/Atom feeds with bounded concurrency, extracts
//! entries tolerantly, keeps the fresh ones, enriches each article with an
//! open-graph image and a translated title, upserts the result into the
//! article store keyed by canonical URL, and derives the featured /
//! latest-drops / live-feed projections the dashboard renders.

pub mod aggregate;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;

mod enrich;
mod fetcher;
mod parser;
mod recency;
mod text;
mod translate;

pub use aggregate::build_projection;
pub use enrich::Enricher;
pub use error::FeedError;
pub use fetcher::FeedFetcher;
pub use parser::parse_feed;
pub use pipeline::{load_feed, refresh_feed, PipelineOptions};
pub use recency::{filter_recent, parse_published, FRESHNESS_WINDOW_HOURS};
pub use store::{article_id, ArticleStore, StoreError};
pub use translate::{TranslateClient, TranslateError};
pub use types::{
    ArticleRecord, EnrichedArticle, FeedProjection, FreshEntry, LiveFeedItem, RawFeedEntry,
    Severity,
};
