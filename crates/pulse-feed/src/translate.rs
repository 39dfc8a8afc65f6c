//! Title translation client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a single translation call.
///
/// `Transport` failures (connect errors, timeouts) are what the enricher
/// counts to decide the endpoint itself is unreachable; status and body
/// failures stay soft per-article fallbacks.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation returned status {0}")]
    Status(u16),

    #[error("translation response parse error: {0}")]
    Body(String),
}

/// HTTP client for a LibreTranslate-compatible endpoint.
pub struct TranslateClient {
    client: Client,
    url: String,
    target: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl TranslateClient {
    /// Create a new `TranslateClient` against `{base_url}/translate`.
    ///
    /// The client is shared with the enricher so one timeout policy covers
    /// every outbound enrichment call.
    #[must_use]
    pub fn new(client: Client, base_url: &str, target: &str) -> Self {
        Self {
            client,
            url: format!("{}/translate", base_url.trim_end_matches('/')),
            target: target.to_string(),
        }
    }

    /// Translate one title into the configured target language.
    ///
    /// The source language is fixed to English; the feeds in the registry are
    /// English-language and no detection is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] when the call fails in transit, returns a
    /// non-success status, or the body does not match the expected shape.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source: "en",
            target: &self.target,
            format: "text",
        };
        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Body(e.to_string()))?;

        Ok(body.translated_text)
    }
}
