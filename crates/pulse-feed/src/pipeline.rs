//! Pipeline orchestration: the refresh and load entry points.

use chrono::{Duration, Utc};

use pulse_core::FeedSource;

use crate::aggregate::build_projection;
use crate::enrich::Enricher;
use crate::error::FeedError;
use crate::fetcher::FeedFetcher;
use crate::recency::{filter_recent, FRESHNESS_WINDOW_HOURS};
use crate::store::ArticleStore;
use crate::types::{ArticleRecord, FeedProjection};

/// Tunables the pipeline does not hard-code.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Entries returned when the freshness window comes up empty.
    pub fallback_recent: usize,
    /// Rows rehydrated from the store on startup.
    pub recent_load_limit: i64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fallback_recent: 10,
            recent_load_limit: 20,
        }
    }
}

/// Run one full refresh cycle.
///
/// 1. Fetch every registered feed concurrently, isolating per-source
///    failures.
/// 2. Keep the entries inside the freshness window (with the most-recent
///    fallback when the window is empty).
/// 3. Enrich each article concurrently (image + translated title).
/// 4. Upsert the enriched set into the store, keyed by canonical URL, so
///    repeated refreshes with unchanged sources never grow it.
/// 5. Derive the display projections from the same ordered list.
///
/// Sources that answer but yield no entries produce an empty projection,
/// which the dashboard renders as its explicit empty state.
///
/// # Errors
///
/// Returns [`FeedError::AllSourcesFailed`] when no source was reachable,
/// [`FeedError::TranslatorUnreachable`] when the translation endpoint was
/// down for every article, or [`FeedError::Store`] when the upsert fails.
pub async fn refresh_feed<S>(
    fetcher: &FeedFetcher,
    enricher: &Enricher,
    store: &S,
    sources: &[FeedSource],
    options: PipelineOptions,
) -> Result<FeedProjection, FeedError>
where
    S: ArticleStore + Sync,
{
    let entries = fetcher.fetch_all(sources).await?;
    if entries.is_empty() {
        tracing::info!("refresh found no entries across all sources");
        return Ok(FeedProjection::empty());
    }

    let fresh = filter_recent(
        &entries,
        Utc::now(),
        Duration::hours(FRESHNESS_WINDOW_HOURS),
        options.fallback_recent,
    );
    if fresh.is_empty() {
        tracing::info!(
            fetched = entries.len(),
            "no entries carried a parsable date; nothing to refresh"
        );
        return Ok(FeedProjection::empty());
    }

    let enriched = enricher.enrich_all(fresh).await?;

    let records: Vec<ArticleRecord> = enriched
        .into_iter()
        .map(ArticleRecord::from_enriched)
        .collect();

    let written = store.upsert_articles(&records).await?;
    tracing::info!(
        articles = records.len(),
        written,
        "refresh cycle persisted"
    );

    Ok(build_projection(&records))
}

/// Rehydrate the dashboard from persisted state, without fetching.
///
/// Returns `None` when the store has no rows or the query fails; the
/// caller substitutes its placeholder content. Rows found are run through
/// the same aggregator as the refresh path.
pub async fn load_feed<S>(store: &S, options: PipelineOptions) -> Option<FeedProjection>
where
    S: ArticleStore + Sync,
{
    match store.recent_articles(options.recent_load_limit).await {
        Ok(rows) if rows.is_empty() => {
            tracing::debug!("article store is empty; nothing to rehydrate");
            None
        }
        Ok(rows) => Some(build_projection(&rows)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load persisted articles; treating as no data");
            None
        }
    }
}
