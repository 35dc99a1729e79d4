//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sales_analytics::{pipeline::fetch::PAGE_SIZE, LazyGenerator, RowCache, SalesAnalyst};
use supabase_client::SupabaseClient;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::{gemini_factory, SupabaseRowSource};
use crate::server::routes::{
    analyze_handler, database_stats_handler, health_handler, metrics_handler,
    monthly_metrics_handler, sync_data_handler,
};

/// Slack on top of the slowest fetch plus both generation attempts.
const REQUEST_MARGIN: Duration = Duration::from_secs(10);

/// Upper bound on one request: every page of a full fetch timing out, then
/// both generation attempts timing out.
pub fn request_timeout(max_records: usize) -> Duration {
    let pages = max_records.div_ceil(PAGE_SIZE).max(1) as u32;
    supabase_client::DEFAULT_TIMEOUT * pages + gemini_client::DEFAULT_TIMEOUT * 2 + REQUEST_MARGIN
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyst: Arc<SalesAnalyst>,
    pub config: Arc<Config>,
}

/// Build the Axum router around an already wired analyst
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    let timeout = request_timeout(state.config.max_records);

    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/metrics", get(metrics_handler))
        .route("/api/monthly-metrics", get(monthly_metrics_handler))
        .route("/api/sync-data", post(sync_data_handler))
        .route("/api/database-stats", get(database_stats_handler))
        .route("/api/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the Axum application from configuration
///
/// The Supabase client is created eagerly; the Gemini client is built on the
/// first question that reaches delegated generation.
pub fn build_app(config: Config) -> Router {
    let supabase = SupabaseClient::new(
        &config.supabase_url,
        &config.supabase_key,
        &config.supabase_table,
    );

    let generator = LazyGenerator::new(gemini_factory(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    let analyst = SalesAnalyst::new(
        Arc::new(SupabaseRowSource::new(supabase)),
        Arc::new(generator),
    )
    .with_cache(Arc::new(RowCache::new(config.row_cache_ttl)))
    .with_max_records(config.max_records);

    build_router(AppState {
        analyst: Arc::new(analyst),
        config: Arc::new(config),
    })
}

/// CORS configuration - any origin unless a list is configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_covers_full_fetch_and_both_attempts() {
        // 10 pages of 8 s plus 2 attempts of 30 s
        assert!(request_timeout(10_000) > Duration::from_secs(140));
        assert!(request_timeout(2_500) > Duration::from_secs(3 * 8 + 2 * 30));
    }

    #[test]
    fn timeout_never_drops_below_one_page() {
        assert_eq!(request_timeout(0), request_timeout(1));
    }
}
