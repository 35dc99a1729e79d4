//! Pure Supabase REST API client.
//!
//! A minimal client for the PostgREST interface Supabase exposes under
//! `/rest/v1`. Only the read path is covered: selecting a window of rows from
//! one table, addressed with the `Range` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use supabase_client::{SupabaseClient, DEFAULT_TABLE};
//!
//! let client = SupabaseClient::new("https://demo.supabase.co", api_key, DEFAULT_TABLE);
//!
//! let rows: Vec<serde_json::Value> = client.select("produto,quantidade", 0, 1000).await?;
//! println!("first page has {} rows", rows.len());
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SupabaseError};
pub use types::{ApiErrorBody, RowRange};

use std::time::Duration;

use serde::de::DeserializeOwned;

/// Default table holding the sales rows.
pub const DEFAULT_TABLE: &str = "vendas_2024";

/// Per-request timeout. Pages are small, so a slow page means trouble upstream.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    timeout: Duration,
}

impl SupabaseClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Select `limit` rows starting at `offset`, projecting `fields`
    /// (PostgREST `select` syntax, `*` for all columns).
    ///
    /// A blank URL or key fails with [`SupabaseError::Config`]. A zero `limit` returns an empty page without touching the network.
    pub async fn select<T: DeserializeOwned>(
        &self,
        fields: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>> {
        if self.base_url.is_empty() || self.api_key.is_empty() {
            return Err(SupabaseError::Config(
                "Supabase URL and key must both be set".to_string(),
            ));
        }

        let range = RowRange::new(offset, limit);
        let Some(range_header) = range.header_value() else {
            return Ok(Vec::new());
        };

        let resp = self
            .client
            .get(self.table_url())
            .query(&[("select", fields)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Range-Unit", "items")
            .header("Range", &range_header)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.summary())
                .unwrap_or(body);
            tracing::warn!(status = %status, table = %self.table, %message, "Supabase select failed");
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<T> = resp
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;
        tracing::debug!(
            table = %self.table,
            range = %range_header,
            count = rows.len(),
            "Fetched Supabase page"
        );
        Ok(rows)
    }
}
