//! Durable article store contract.
//!
//! The pipeline depends on this narrow seam instead of a concrete database
//! so the store is an injected capability: the Postgres implementation
//! lives in `pulse-db`, and tests substitute an in-memory one.

use std::future::Future;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::ArticleRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage query failed: {0}")]
    Query(String),
}

/// Read/write contract of the durable article store.
///
/// `upsert_articles` must be keyed by canonical URL: writing a URL already
/// present replaces the stored row's fields rather than appending a
/// duplicate. `recent_articles` returns the top-N rows ordered by publish
/// timestamp descending.
pub trait ArticleStore {
    fn upsert_articles(
        &self,
        articles: &[ArticleRecord],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    fn recent_articles(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<ArticleRecord>, StoreError>> + Send;
}

/// Derive a stable article ID from the canonical URL.
///
/// Takes the first 8 bytes of SHA-256(url) rendered as hex. The same URL
/// always produces the same ID, across refresh cycles and processes.
#[must_use]
pub fn article_id(url: &str) -> String {
    let hash = Sha256::digest(url.as_bytes());
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA256 is at least 8 bytes");
    format!("{:016x}", u64::from_be_bytes(bytes))
}
