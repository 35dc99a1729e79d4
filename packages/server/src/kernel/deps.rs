//! Server dependencies for the analytics pipeline
//!
//! The pipeline only knows [`RowSource`] and [`TextGenerator`]. This module
//! wraps the Supabase and Gemini clients so they can be injected, and maps
//! their errors onto the pipeline's taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use gemini_client::{
    GeminiClient, GeminiError, GenerateRequest, GenerationConfig, HarmBlockThreshold,
};
use sales_analytics::{
    FetchError, FetchResult, GenerationError, GenerationRequest, RawSalesRow, RowSource,
    TextGenerator,
};
use supabase_client::{SupabaseClient, SupabaseError};

// =============================================================================
// Supabase adapter (implements RowSource)
// =============================================================================

/// Wrapper around SupabaseClient that implements RowSource
pub struct SupabaseRowSource(pub SupabaseClient);

impl SupabaseRowSource {
    pub fn new(client: SupabaseClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl RowSource for SupabaseRowSource {
    async fn select(
        &self,
        fields: &str,
        offset: usize,
        limit: usize,
    ) -> FetchResult<Vec<RawSalesRow>> {
        self.0
            .select(fields, offset, limit)
            .await
            .map_err(fetch_error)
    }
}

fn fetch_error(e: SupabaseError) -> FetchError {
    match e {
        SupabaseError::Config(msg) => FetchError::NotConfigured(msg),
        SupabaseError::Api { status, message } => FetchError::Rejected { status, message },
        SupabaseError::Parse(msg) => FetchError::Decode(msg),
        e @ SupabaseError::Network(_) => FetchError::Transport(Box::new(e)),
    }
}

// =============================================================================
// Gemini adapter (implements TextGenerator)
// =============================================================================

/// Wrapper around GeminiClient that implements TextGenerator
pub struct GeminiGenerator(pub GeminiClient);

impl GeminiGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.0
            .generate_text(gemini_request(request))
            .await
            .map_err(generation_error)
    }
}

fn gemini_request(request: &GenerationRequest) -> GenerateRequest {
    let gemini = GenerateRequest::prompt(request.prompt.clone()).config(GenerationConfig {
        temperature: Some(request.temperature),
        max_output_tokens: Some(request.max_output_tokens),
        top_p: request.top_p,
        top_k: request.top_k,
    });

    if request.relax_safety {
        gemini.safety_threshold(HarmBlockThreshold::BlockNone)
    } else {
        gemini
    }
}

fn generation_error(e: GeminiError) -> GenerationError {
    match e {
        GeminiError::Blocked { reason } => GenerationError::ContentFiltered(reason),
        GeminiError::Empty { .. } => GenerationError::Empty,
        other => GenerationError::Transport(other.to_string()),
    }
}

/// Factory for [`sales_analytics::LazyGenerator`]: builds a Gemini client on
/// first use, or fails every call while no API key is configured.
pub fn gemini_factory(
    api_key: Option<String>,
    model: String,
) -> impl Fn() -> Result<Arc<dyn TextGenerator>, GenerationError> + Send + Sync + 'static {
    move || {
        let Some(key) = api_key.as_deref() else {
            return Err(GenerationError::Transport("GEMINI_API_KEY not set".into()));
        };
        tracing::info!(model = %model, "Initializing Gemini client");
        let generator: Arc<dyn TextGenerator> =
            Arc::new(GeminiGenerator::new(GeminiClient::new(key).with_model(model.clone())));
        Ok(generator)
    }
}
