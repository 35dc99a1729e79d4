// Main entry point for API server

use anyhow::{Context, Result};
use server_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sales_analytics=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sales Insights API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        table = %config.supabase_table,
        model = %config.gemini_model,
        gemini_configured = config.gemini_api_key.is_some(),
        max_records = config.max_records,
        cache_ttl_secs = config.row_cache_ttl.as_secs(),
        "Configuration loaded"
    );
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, every question will use the keyword fallback");
    }

    let port = config.port;
    let app = build_app(config);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
