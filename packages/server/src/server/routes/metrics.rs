use axum::{extract::Extension, Json};
use sales_analytics::{MonthlyMetrics, SummaryMetrics};

use crate::server::app::AppState;

/// Dashboard headline metrics.
///
/// Returns 200 even when the row-store is unreachable; the body then carries
/// the "Erro ao carregar" sentinels and an `error` field.
pub async fn metrics_handler(Extension(state): Extension<AppState>) -> Json<SummaryMetrics> {
    let metrics = state.analyst.summary_metrics().await;
    if let Some(error) = &metrics.error {
        tracing::warn!(error = %error, "Serving metrics sentinels");
    }
    Json(metrics)
}

/// Per-month revenue, units and top products, oldest month first.
pub async fn monthly_metrics_handler(
    Extension(state): Extension<AppState>,
) -> Json<MonthlyMetrics> {
    Json(state.analyst.monthly_metrics().await)
}
