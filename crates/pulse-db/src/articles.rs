use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pulse_feed::{ArticleRecord, ArticleStore, StoreError};

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
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

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            original_title: row.original_title,
            summary: row.summary,
            source: row.source,
            url: row.url,
            image_url: row.image_url,
            published_at: row.published_at,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

/// Upsert a batch of articles, keyed by canonical URL.
///
/// A write for a URL already present replaces the stored row's display
/// fields (last-write-wins); the row's `id` and `created_at` are untouched,
/// so repeated refresh cycles with unchanged sources never grow the table.
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_articles(pool: &PgPool, articles: &[ArticleRecord]) -> Result<u64, DbError> {
    let mut written = 0u64;
    for article in articles {
        let result = sqlx::query(
            "INSERT INTO articles \
               (id, title, original_title, summary, source, url, image_url, published_at, category) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (url) DO UPDATE SET \
               title = EXCLUDED.title, \
               original_title = EXCLUDED.original_title, \
               summary = EXCLUDED.summary, \
               source = EXCLUDED.source, \
               image_url = EXCLUDED.image_url, \
               published_at = EXCLUDED.published_at, \
               category = EXCLUDED.category, \
               updated_at = NOW()",
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.original_title)
        .bind(&article.summary)
        .bind(&article.source)
        .bind(&article.url)
        .bind(&article.image_url)
        .bind(article.published_at)
        .bind(&article.category)
        .execute(pool)
        .await?;
        written += result.rows_affected();
    }
    Ok(written)
}

/// Fetch the most recent articles ordered by publish time descending.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn recent_articles(pool: &PgPool, limit: i64) -> Result<Vec<ArticleRow>, DbError> {
    Ok(sqlx::query_as::<_, ArticleRow>(
        "SELECT id, title, original_title, summary, source, url, image_url, \
                published_at, category, created_at \
         FROM articles \
         ORDER BY published_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// The Postgres-backed [`ArticleStore`] handed to the pipeline.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ArticleStore for PgArticleStore {
    async fn upsert_articles(&self, articles: &[ArticleRecord]) -> Result<u64, StoreError> {
        upsert_articles(&self.pool, articles)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn recent_articles(&self, limit: i64) -> Result<Vec<ArticleRecord>, StoreError> {
        recent_articles(&self.pool, limit)
            .await
            .map(|rows| rows.into_iter().map(ArticleRecord::from).collect())
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}
