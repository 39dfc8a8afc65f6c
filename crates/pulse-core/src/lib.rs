//! Shared configuration for the AI Pulse ingestion backend.
//!
//! Holds the application config loaded from environment variables and the
//! feed source registry loaded from `config/feeds.yaml`.

use thiserror::Error;

mod app_config;
mod config;
mod feeds;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feeds::{load_feeds, FeedSource, FeedsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read feeds file {path}: {source}")]
    FeedsFileIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse feeds file: {0}")]
    FeedsFileParse(#[from] serde_yaml::Error),

    #[error("feeds config validation failed: {0}")]
    Validation(String),
}
