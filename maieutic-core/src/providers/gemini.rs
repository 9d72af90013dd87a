//! Google Gemini adapter
//!
//! Talks to the `generateContent` API. Gemini is the provider that most
//! often answers "200 OK, no usable content": a prompt-level block in
//! `promptFeedback`, a non-`STOP` finish reason on the best candidate, or a
//! shape with no candidates at all. Extraction normalizes each of these into
//! a filter signal.
//!
//! Requests carry relaxed safety thresholds (`BLOCK_ONLY_HIGH`) so that
//! philosophical back-and-forth is not tripped up by default-strictness
//! filters; genuinely high-risk prompts still get blocked.

use crate::config::SecretString;
use crate::http::HttpClient;
use crate::protocol::GenerationRequest;
use crate::providers::adapter::{ensure_prompt, ProviderAdapter, RawResponse};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::safety::FilterReason;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling defaults applied when the request leaves them unset
const DEFAULT_TOP_P: f32 = 0.9;
const DEFAULT_TOP_K: u32 = 40;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
    /// Plain-text fallback some response shapes carry instead of candidates.
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Adapter for Google's Gemini generateContent API.
pub struct GeminiAdapter {
    api_key: SecretString,
    model: String,
    base_url: String,
    http: HttpClient,
}

impl GeminiAdapter {
    pub fn new(api_key: SecretString, model: String, http: HttpClient) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        }
    }

    /// Override the base URL, used to point at a mock server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        // Key goes in a header, not the query string, so request logs stay
        // credential-free.
        vec![
            ("x-goog-api-key", self.api_key.expose_secret().to_string()),
            ("content-type", "application/json".to_string()),
        ]
    }

    fn safety_settings() -> Vec<SafetySetting> {
        HARM_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category,
                threshold: "BLOCK_ONLY_HIGH",
            })
            .collect()
    }

    fn map_finish_reason(reason: &str) -> Option<FilterReason> {
        match reason {
            "STOP" => None,
            "SAFETY" => Some(FilterReason::Safety),
            "MAX_TOKENS" => Some(FilterReason::MaxTokens),
            "RECITATION" => Some(FilterReason::Recitation),
            _ => Some(FilterReason::Other),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn invoke(&self, request: &GenerationRequest) -> ProviderResult<RawResponse> {
        ensure_prompt(request)?;

        let body = serde_json::to_value(GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
                top_p: request.top_p.unwrap_or(DEFAULT_TOP_P),
                top_k: request.top_k.unwrap_or(DEFAULT_TOP_K),
            },
            safety_settings: Self::safety_settings(),
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let raw = self
            .http
            .post_json(self.name(), &url, &self.headers(), &body)
            .await?;
        Ok(RawResponse(raw))
    }

    fn extract_text(&self, raw: RawResponse) -> ProviderResult<String> {
        let response: GenerateContentResponse = serde_json::from_value(raw.0)?;

        // A prompt-level block arrives before any candidate exists.
        if let Some(feedback) = &response.prompt_feedback {
            if feedback.block_reason.is_some() {
                return Err(ProviderError::ContentFiltered {
                    reason: FilterReason::PromptBlocked,
                });
            }
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            // No candidates, but some shapes still carry a top-level text field.
            return match response.text {
                Some(text) if !text.is_empty() => Ok(text),
                _ => Err(ProviderError::ContentFiltered {
                    reason: FilterReason::Unrecognized,
                }),
            };
        };

        if let Some(reason) = candidate
            .finish_reason
            .as_deref()
            .and_then(Self::map_finish_reason)
        {
            // Partial candidate text is discarded rather than surfaced
            // truncated mid-thought.
            return Err(ProviderError::ContentFiltered { reason });
        }

        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text));

        match text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ProviderError::ContentFiltered {
                reason: FilterReason::Unrecognized,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::new(
            SecretString::new("test-key"),
            "gemini-pro".to_string(),
            HttpClient::new().unwrap(),
        )
    }

    #[test]
    fn test_extract_text_normal_completion() {
        let raw = RawResponse::new(json!({
            "candidates": [{
                "content": {"parts": [{"text": "What do you mean by justice?"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(
            adapter().extract_text(raw).unwrap(),
            "What do you mean by justice?"
        );
    }

    #[test]
    fn test_extract_text_prompt_block() {
        let raw = RawResponse::new(json!({
            "promptFeedback": {"blockReason": "SAFETY"},
            "candidates": []
        }));
        let err = adapter().extract_text(raw).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ContentFiltered {
                reason: FilterReason::PromptBlocked
            }
        ));
    }

    #[test_case("SAFETY", FilterReason::Safety)]
    #[test_case("MAX_TOKENS", FilterReason::MaxTokens)]
    #[test_case("RECITATION", FilterReason::Recitation)]
    #[test_case("OTHER", FilterReason::Other)]
    fn test_extract_text_non_normal_finish(reason: &str, expected: FilterReason) {
        let raw = RawResponse::new(json!({
            "candidates": [{
                "content": {"parts": [{"text": "partial text that must not surface"}]},
                "finishReason": reason
            }]
        }));
        let err = adapter().extract_text(raw).unwrap_err();
        match err {
            ProviderError::ContentFiltered { reason } => assert_eq!(reason, expected),
            other => panic!("expected ContentFiltered, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_top_level_text_without_candidates() {
        let raw = RawResponse::new(json!({"text": "What is virtue, then?"}));
        assert_eq!(adapter().extract_text(raw).unwrap(), "What is virtue, then?");
    }

    #[test]
    fn test_extract_text_empty_shape() {
        let raw = RawResponse::new(json!({}));
        let err = adapter().extract_text(raw).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ContentFiltered {
                reason: FilterReason::Unrecognized
            }
        ));
    }

    #[test]
    fn test_request_body_carries_sampling_and_safety() {
        let request = GenerationRequest::new("prompt");
        let body = serde_json::to_value(GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
                top_p: request.top_p.unwrap_or(DEFAULT_TOP_P),
                top_k: request.top_k.unwrap_or(DEFAULT_TOP_K),
            },
            safety_settings: GeminiAdapter::safety_settings(),
        })
        .unwrap();

        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        let top_p = body["generationConfig"]["topP"].as_f64().unwrap();
        assert!((top_p - 0.9).abs() < 1e-6);
        assert_eq!(body["generationConfig"]["topK"], 40);
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s["threshold"] == "BLOCK_ONLY_HIGH"));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_network() {
        let err = adapter()
            .invoke(&GenerationRequest::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyPrompt));
    }
}
