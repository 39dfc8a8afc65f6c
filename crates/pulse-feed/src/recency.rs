//! Freshness windowing over combined feed entries.

use chrono::{DateTime, Duration, Utc};

use crate::types::{FreshEntry, RawFeedEntry};

/// Age threshold for an entry to count as current.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// Parse a feed-native date string.
///
/// RSS feeds carry RFC 2822 dates, Atom feeds RFC 3339; anything else is
/// treated as unparsable and the entry is dropped before windowing.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Select the entries inside the freshness window, with a fallback when the
/// window is empty.
///
/// Entries whose date does not parse are dropped first; they are invalid,
/// never "recent" or "old". If the window selects nothing but valid entries
/// exist, the `fallback_recent` most recent valid entries are returned
/// instead, so a quiet window never empties the dashboard. Empty input stays
/// empty, and a non-empty window result never triggers the fallback.
#[must_use]
pub fn filter_recent(
    entries: &[RawFeedEntry],
    now: DateTime<Utc>,
    window: Duration,
    fallback_recent: usize,
) -> Vec<FreshEntry> {
    let valid: Vec<FreshEntry> = entries
        .iter()
        .filter_map(|entry| {
            parse_published(&entry.published_at).map(|published_at| FreshEntry {
                title: entry.title.clone(),
                url: entry.url.clone(),
                published_at,
                description: entry.description.clone(),
                source_name: entry.source_name.clone(),
                category: entry.category.clone(),
            })
        })
        .collect();

    let fresh: Vec<FreshEntry> = valid
        .iter()
        .filter(|entry| now.signed_duration_since(entry.published_at) < window)
        .cloned()
        .collect();

    if !fresh.is_empty() || valid.is_empty() {
        return fresh;
    }

    tracing::info!(
        valid = valid.len(),
        fallback_recent,
        "freshness window empty; falling back to most recent valid entries"
    );
    let mut sorted = valid;
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted.truncate(fallback_recent);
    sorted
}
