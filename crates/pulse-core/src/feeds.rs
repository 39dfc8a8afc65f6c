use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One RSS/Atom endpoint in the feed registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    /// Display name shown next to every article from this source.
    pub name: String,
    /// Feed endpoint URL.
    pub url: String,
    /// Display category attached to articles from this source.
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "Tech".to_string()
}

#[derive(Debug, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedSource>,
}

/// Load and validate the feed registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feeds_file: FeedsFile = serde_yaml::from_str(&content)?;

    validate_feeds(&feeds_file)?;

    Ok(feeds_file)
}

fn validate_feeds(feeds_file: &FeedsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for feed in &feeds_file.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }

        if !feed.url.starts_with("http://") && !feed.url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has invalid url '{}'; must start with http:// or https://",
                feed.name, feed.url
            )));
        }

        if !seen_names.insert(feed.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }
    }

    Ok(())
}
