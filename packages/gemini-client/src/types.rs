//! Gemini API request and response types.

use serde::{Deserialize, Serialize};

use crate::error::{GeminiError, Result};

// =============================================================================
// Request
// =============================================================================

/// `generateContent` request body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateRequest {
    /// Single-turn request with one user prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            ..Default::default()
        }
    }

    /// Set the sampling configuration.
    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Apply one threshold to every harm category.
    pub fn safety_threshold(mut self, threshold: HarmBlockThreshold) -> Self {
        self.safety_settings = HarmCategory::ALL
            .iter()
            .map(|category| SafetySetting {
                category: *category,
                threshold,
            })
            .collect();
        self
    }
}

/// One turn of conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHateSpeech,
    HarmCategoryHarassment,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

// =============================================================================
// Response
// =============================================================================

/// `generateContent` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    pub prompt_feedback: Option<PromptFeedback>,

    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Finish reasons that mean the safety layer stopped the candidate.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

impl GenerateResponse {
    /// Text of the first candidate, or the reason there is none.
    pub fn into_text(self) -> Result<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Err(GeminiError::Blocked { reason }),
                None => Err(GeminiError::Empty {
                    finish_reason: None,
                }),
            };
        };

        let text = candidate
            .content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason {
            Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
                Err(GeminiError::Blocked { reason })
            }
            finish_reason => Err(GeminiError::Empty { finish_reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateRequest::prompt("oi")
            .config(GenerationConfig {
                temperature: Some(0.2),
                max_output_tokens: Some(2048),
                top_p: None,
                top_k: Some(40),
            })
            .safety_threshold(HarmBlockThreshold::BlockNone);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "oi");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert!(value["generationConfig"].get("topP").is_none());
        assert_eq!(value["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            value["safetySettings"][0]["category"],
            "HARM_CATEGORY_HATE_SPEECH"
        );
        assert_eq!(value["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn text_is_joined_across_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Olá, "},{"text":"mundo"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(response.into_text().unwrap(), "Olá, mundo");
    }

    #[test]
    fn missing_candidates_is_empty() {
        let err = parse(r#"{}"#).into_text().unwrap_err();
        assert!(err.is_empty());
    }

    #[test]
    fn prompt_block_is_blocked() {
        let err = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .into_text()
            .unwrap_err();
        assert!(err.is_blocked());
    }

    #[test]
    fn safety_finish_without_parts_is_blocked() {
        let err = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .into_text()
            .unwrap_err();
        assert!(err.is_blocked());
    }

    #[test]
    fn recitation_finish_is_empty() {
        let err = parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"RECITATION"}]}"#)
            .into_text()
            .unwrap_err();
        match err {
            GeminiError::Empty { finish_reason } => {
                assert_eq!(finish_reason.as_deref(), Some("RECITATION"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
