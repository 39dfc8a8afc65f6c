use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed '{feed}' returned status {status}")]
    UnexpectedStatus { feed: String, status: u16 },

    #[error("all {0} feed sources failed")]
    AllSourcesFailed(usize),

    #[error("translation endpoint unreachable ({failed} of {total} calls failed in transit)")]
    TranslatorUnreachable { failed: usize, total: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
