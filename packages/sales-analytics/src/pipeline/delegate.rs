//! Delegated answer generation with one reduced-prompt retry.

use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::pipeline::prompt::{full_request, reduced_request};
use crate::traits::generator::{GenerationRequest, TextGenerator};
use crate::types::summary::SalesSummary;

/// How the delegated attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationOutcome {
    Success,
    EmptyResponse,
    ContentFiltered,
    TransportError,
}

impl DelegationOutcome {
    fn from_error(error: &GenerationError) -> Self {
        match error {
            GenerationError::Empty => Self::EmptyResponse,
            GenerationError::ContentFiltered(_) => Self::ContentFiltered,
            GenerationError::Transport(_) => Self::TransportError,
        }
    }
}

/// Result of [`generate`]. `text` is set exactly when the outcome is
/// [`DelegationOutcome::Success`].
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedAnswer {
    pub text: Option<String>,
    pub outcome: DelegationOutcome,
    /// Calls made to the generator: 1, or 2 after a content-filter retry.
    pub attempts: u8,
}

impl DelegatedAnswer {
    fn success(text: String, attempts: u8) -> Self {
        Self {
            text: Some(text),
            outcome: DelegationOutcome::Success,
            attempts,
        }
    }

    fn rejected(outcome: DelegationOutcome, attempts: u8) -> Self {
        Self {
            text: None,
            outcome,
            attempts,
        }
    }
}

/// Ask the generator to answer `question` from `summary`.
///
/// A content-filter rejection is retried once with the reduced prompt; any
/// other failure, or a failed retry, is final. Never returns an error: the
/// outcome tells the caller whether to fall back.
pub async fn generate(
    generator: &dyn TextGenerator,
    summary: &SalesSummary,
    question: &str,
) -> DelegatedAnswer {
    let request = full_request(summary, question);
    debug!(prompt_chars = request.prompt.chars().count(), "Sending full prompt");

    let error = match attempt(generator, &request).await {
        Ok(text) => return DelegatedAnswer::success(text, 1),
        Err(e) => e,
    };

    let outcome = DelegationOutcome::from_error(&error);
    if outcome != DelegationOutcome::ContentFiltered {
        warn!(error = %error, ?outcome, "Delegated generation rejected");
        return DelegatedAnswer::rejected(outcome, 1);
    }

    info!(error = %error, "Full prompt filtered, retrying with reduced prompt");
    let retry = reduced_request(summary, question);
    debug!(prompt_chars = retry.prompt.chars().count(), "Sending reduced prompt");

    match attempt(generator, &retry).await {
        Ok(text) => DelegatedAnswer::success(text, 2),
        Err(e) => {
            let outcome = DelegationOutcome::from_error(&e);
            warn!(error = %e, ?outcome, "Reduced prompt rejected as well");
            DelegatedAnswer::rejected(outcome, 2)
        }
    }
}

async fn attempt(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> Result<String, GenerationError> {
    let text = generator.generate(request).await?;
    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text)
}
