// Common test utilities

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use sales_analytics::{
    testing::{MockGenerator, MockRowSource},
    RowCache, SalesAnalyst,
};
use serde_json::Value;
use server_core::{
    server::{build_router, AppState},
    Config,
};
use tower::ServiceExt;

/// Configuration as the binary would load it, without touching the environment.
pub fn test_config() -> Config {
    Config {
        supabase_url: "https://demo.supabase.co".to_string(),
        supabase_key: "anon-key".to_string(),
        supabase_table: "vendas_2024".to_string(),
        gemini_api_key: None,
        gemini_model: "gemini-2.0-flash".to_string(),
        port: 5000,
        max_records: 10_000,
        row_cache_ttl: Duration::from_secs(300),
        allowed_origins: Vec::new(),
    }
}

/// Router over mocked collaborators.
pub fn test_app(source: Arc<MockRowSource>, generator: MockGenerator) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let analyst = SalesAnalyst::new(source, Arc::new(generator))
        .with_cache(Arc::new(RowCache::new(Duration::from_secs(300))));

    build_router(AppState {
        analyst: Arc::new(analyst),
        config: Arc::new(test_config()),
    })
}

/// Send one request and decode the JSON body.
pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
