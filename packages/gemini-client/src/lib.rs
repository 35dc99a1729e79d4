//! Pure Google Gemini REST API client
//!
//! A minimal client for the `generateContent` endpoint with no domain-specific
//! logic. Responses are classified so callers can tell a refused or empty
//! answer apart from a transport failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateRequest, GenerationConfig, HarmBlockThreshold};
//!
//! let client = GeminiClient::new(api_key).with_model("gemini-2.0-flash");
//!
//! let text = client
//!     .generate_text(
//!         GenerateRequest::prompt("Resuma as vendas de janeiro")
//!             .config(GenerationConfig { temperature: Some(0.2), ..Default::default() })
//!             .safety_threshold(HarmBlockThreshold::BlockNone),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default model when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Per-request timeout unless overridden with [`GeminiClient::with_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base URL (for proxies or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name (e.g. `gemini-2.5-flash`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Raw `generateContent` call.
    pub async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            candidates = body.candidates.len(),
            total_tokens = body.usage_metadata.as_ref().and_then(|u| u.total_token_count),
            "Gemini generateContent"
        );

        Ok(body)
    }

    /// Generate and return the first candidate's text.
    ///
    /// Fails with [`GeminiError::Empty`] or [`GeminiError::Blocked`] when the
    /// call succeeded but produced no usable text.
    pub async fn generate_text(&self, request: GenerateRequest) -> Result<String> {
        self.generate_content(&request).await?.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("key-test")
            .with_base_url("https://proxy.local/v1beta")
            .with_model("gemini-2.5-flash");

        assert_eq!(client.api_key, "key-test");
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://proxy.local/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = GeminiClient::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(500));

        let err = client
            .generate_text(GenerateRequest::prompt("oi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::Network(_)));
    }
}
