use axum::{extract::Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    supabase_url_configured: bool,
    supabase_key_configured: bool,
    gemini_key_configured: bool,
    table_name: String,
    model: String,
    timestamp: String,
}

/// Health check endpoint
///
/// Reports which credentials are present without contacting either service,
/// so it stays cheap enough for load balancer checks.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let config = &state.config;

    Json(HealthResponse {
        status: "healthy".to_string(),
        supabase_url_configured: !config.supabase_url.is_empty(),
        supabase_key_configured: !config.supabase_key.is_empty(),
        gemini_key_configured: config.gemini_api_key.is_some(),
        table_name: config.supabase_table.clone(),
        model: config.gemini_model.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
