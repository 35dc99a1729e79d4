use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;

/// Question body; older clients send `question`, newer ones `message`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

impl AnalyzeRequest {
    /// The first non-blank of `message` and `question`.
    pub fn text(&self) -> &str {
        [&self.message, &self.question]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub answer: String,
}

/// Answer a sales question.
///
/// Always 200: a missing or unreadable body is treated as an empty question,
/// and pipeline failures come back as answer text.
pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Json<AnalyzeResponse> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable analyze body");
            AnalyzeRequest::default()
        }
    };

    let question = request.text();
    tracing::info!(question = %question, "Question received");

    let answer = state.analyst.ask(question).await;
    tracing::debug!(source = ?answer.source, chars = answer.text.len(), "Question answered");

    Json(AnalyzeResponse {
        answer: answer.text,
    })
}
