use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct AdminError {
    success: bool,
    message: String,
    error: String,
}

impl AdminError {
    fn new(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.to_string(),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Drop the cached rows and refetch the whole table.
pub async fn sync_data_handler(Extension(state): Extension<AppState>) -> Response {
    match state.analyst.sync().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Data sync failed");
            AdminError::new("❌ Erro ao sincronizar dados.", e).into_response()
        }
    }
}

/// Row count and date range of the table.
pub async fn database_stats_handler(Extension(state): Extension<AppState>) -> Response {
    match state.analyst.database_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Database stats unavailable");
            AdminError::new("❌ Não foi possível consultar o banco de dados.", e)
                .into_response()
        }
    }
}
