//! Derivation of the dashboard projections from one ordered article list.

use crate::text::{truncate_chars, SUMMARY_DISPLAY_MAX};
use crate::types::{ArticleRecord, FeedProjection, LiveFeedItem, Severity};

/// Positional severities for the live-feed rows.
const LIVE_FEED_SEVERITIES: [Severity; 5] = [
    Severity::Critical,
    Severity::Major,
    Severity::Major,
    Severity::Normal,
    Severity::Normal,
];

/// Positional colors, parallel to the severities.
const LIVE_FEED_PALETTE: [&str; 5] = ["#EF4444", "#F59E0B", "#22C55E", "#22C55E", "#22C55E"];

const DEFAULT_COLOR: &str = "#22C55E";

/// Number of articles on the live-feed rail.
const LIVE_FEED_LEN: usize = 5;

/// Build the three display projections from one ordered
/// (most-recent-first) article list.
///
/// Featured takes the first 2 articles, latest drops the next 4, and the
/// live feed the first 5 with positional severity and color. All three are
/// views over the same list; the total counts the whole list, not the
/// displayed subset. Pure: both the refresh path and the load path call
/// this, so the two render identically.
#[must_use]
pub fn build_projection(articles: &[ArticleRecord]) -> FeedProjection {
    let featured = articles.iter().take(2).map(display_card).collect();
    let latest_drops = articles.iter().skip(2).take(4).map(display_card).collect();

    let live_feed = articles
        .iter()
        .take(LIVE_FEED_LEN)
        .enumerate()
        .map(|(position, article)| LiveFeedItem {
            id: article.id.clone(),
            text: article.title.clone(),
            timestamp: article.published_at,
            severity: severity_for(position),
            color: color_for(position).to_string(),
            source: article.source.clone(),
        })
        .collect();

    FeedProjection {
        featured,
        latest_drops,
        live_feed,
        total_articles: articles.len(),
    }
}

/// Clone a record with its summary capped for card display.
fn display_card(article: &ArticleRecord) -> ArticleRecord {
    let mut card = article.clone();
    card.summary = truncate_chars(&card.summary, SUMMARY_DISPLAY_MAX);
    card
}

fn severity_for(position: usize) -> Severity {
    LIVE_FEED_SEVERITIES
        .get(position)
        .copied()
        .unwrap_or(Severity::Normal)
}

fn color_for(position: usize) -> &'static str {
    LIVE_FEED_PALETTE.get(position).copied().unwrap_or(DEFAULT_COLOR)
}
