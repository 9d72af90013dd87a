//! OpenAI adapter
//!
//! Talks to the Chat Completions API. Content filtering shows up as a
//! `finish_reason` on the first choice rather than an error status.

use crate::config::SecretString;
use crate::http::HttpClient;
use crate::protocol::GenerationRequest;
use crate::providers::adapter::{ensure_prompt, ProviderAdapter, RawResponse};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::safety::FilterReason;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat Completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat Completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Adapter for OpenAI's Chat Completions API.
pub struct OpenAiAdapter {
    api_key: SecretString,
    model: String,
    base_url: String,
    http: HttpClient,
}

impl OpenAiAdapter {
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
        vec![
            (
                "authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            ),
            ("content-type", "application/json".to_string()),
        ]
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn invoke(&self, request: &GenerationRequest) -> ProviderResult<RawResponse> {
        ensure_prompt(request)?;

        let body = serde_json::to_value(ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        })?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let raw = self
            .http
            .post_json(self.name(), &url, &self.headers(), &body)
            .await?;
        Ok(RawResponse(raw))
    }

    fn extract_text(&self, raw: RawResponse) -> ProviderResult<String> {
        let response: ChatResponse = serde_json::from_value(raw.0)?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(ProviderError::ContentFiltered {
                reason: FilterReason::Unrecognized,
            });
        };

        match choice.finish_reason.as_deref() {
            Some("content_filter") => {
                return Err(ProviderError::ContentFiltered {
                    reason: FilterReason::Safety,
                })
            }
            Some("length") => {
                return Err(ProviderError::ContentFiltered {
                    reason: FilterReason::MaxTokens,
                })
            }
            _ => {}
        }

        match choice.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ProviderError::ContentFiltered {
                reason: FilterReason::Unrecognized,
            }),
        }
    }
}
