use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use gemini_client::DEFAULT_MODEL;
use sales_analytics::cache::DEFAULT_TTL;
use sales_analytics::pipeline::fetch::DEFAULT_MAX_RECORDS;
use supabase_client::DEFAULT_TABLE;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_table: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub port: u16,
    pub max_records: usize,
    pub row_cache_ttl: Duration,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            supabase_url: var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            supabase_key: var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?,
            supabase_table: var("SUPABASE_TABLE_NAME")
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            max_records: match var("MAX_RECORDS") {
                Some(v) => v.parse().context("MAX_RECORDS must be a valid number")?,
                None => DEFAULT_MAX_RECORDS,
            },
            row_cache_ttl: match var("ROW_CACHE_TTL_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse()
                        .context("ROW_CACHE_TTL_SECS must be a number of seconds")?,
                ),
                None => DEFAULT_TTL,
            },
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }
}

/// Comma-separated origins; `*` alone means any.
fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SUPABASE_URL", "https://demo.supabase.co"),
        ("SUPABASE_KEY", "anon-key"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.supabase_table, "vendas_2024");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_records, 10_000);
        assert_eq!(config.row_cache_ttl, Duration::from_secs(300));
        assert!(config.gemini_api_key.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn missing_supabase_key_fails() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_KEY"));
    }

    #[test]
    fn blank_gemini_key_is_unset() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GEMINI_API_KEY", "  "));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn overrides_parse() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("MAX_RECORDS", "2500"),
            ("ROW_CACHE_TTL_SECS", "0"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://painel.exemplo.com"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_records, 2500);
        assert_eq!(config.row_cache_ttl, Duration::ZERO);
        assert_eq!(
            config.allowed_origins,
            ["http://localhost:3000", "https://painel.exemplo.com"]
        );
    }

    #[test]
    fn bad_port_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "cinco mil"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("http://a.com,*").is_empty());
    }
}
