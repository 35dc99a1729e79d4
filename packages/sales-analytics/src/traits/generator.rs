//! Text generation capability and its lazily-built wrapper.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::GenerationError;

/// One prompt plus sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    /// Ask the provider to disable its harm-category blocking.
    pub relax_safety: bool,
}

/// Turns a prompt into text, or says why it could not.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Builds the real generator on first use.
pub type GeneratorFactory =
    Box<dyn Fn() -> Result<Arc<dyn TextGenerator>, GenerationError> + Send + Sync>;

/// A [`TextGenerator`] whose backing client is constructed the first time a
/// prompt is sent.
///
/// A failing factory is retried on the next call; until it succeeds every call
/// fails with the factory's error, which routes the caller to its fallback.
pub struct LazyGenerator {
    factory: GeneratorFactory,
    inner: OnceCell<Arc<dyn TextGenerator>>,
}

impl LazyGenerator {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextGenerator>, GenerationError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            inner: OnceCell::new(),
        }
    }

    /// Whether the backing generator has been built.
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized()
    }

    async fn get(&self) -> Result<&Arc<dyn TextGenerator>, GenerationError> {
        self.inner
            .get_or_try_init(|| async { (self.factory)() })
            .await
    }
}

#[async_trait]
impl TextGenerator for LazyGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let generator = self.get().await?;
        generator.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "oi".into(),
            temperature: 0.2,
            max_output_tokens: 16,
            top_p: None,
            top_k: None,
            relax_safety: false,
        }
    }

    #[tokio::test]
    async fn factory_runs_once_on_success() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let lazy = LazyGenerator::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let mock: Arc<dyn TextGenerator> =
                Arc::new(MockGenerator::new().then_text("um").then_text("dois"));
            Ok(mock)
        });

        assert!(!lazy.is_initialized());
        assert_eq!(lazy.generate(&request()).await.unwrap(), "um");
        assert_eq!(lazy.generate(&request()).await.unwrap(), "dois");
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(lazy.is_initialized());
    }

    #[tokio::test]
    async fn failing_factory_surfaces_as_error() {
        let lazy = LazyGenerator::new(|| {
            Err(GenerationError::Transport("GEMINI_API_KEY not set".into()))
        });

        let err = lazy.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        assert!(!lazy.is_initialized());
    }
}
