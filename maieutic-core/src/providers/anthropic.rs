//! Anthropic adapter
//!
//! Talks to the Messages API. Anthropic reports throttling and server
//! overload through HTTP statuses, so most normalization happens in the HTTP
//! layer; extraction only has to deal with `stop_reason` and the content
//! block list.

use crate::config::SecretString;
use crate::http::HttpClient;
use crate::protocol::GenerationRequest;
use crate::providers::adapter::{ensure_prompt, ProviderAdapter, RawResponse};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::safety::FilterReason;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: &'a str,
}

/// Messages API response body
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Adapter for Anthropic's Messages API.
pub struct AnthropicAdapter {
    api_key: SecretString,
    model: String,
    base_url: String,
    http: HttpClient,
}

impl AnthropicAdapter {
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
            ("x-api-key", self.api_key.expose_secret().to_string()),
            ("anthropic-version", API_VERSION.to_string()),
            ("content-type", "application/json".to_string()),
        ]
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn invoke(&self, request: &GenerationRequest) -> ProviderResult<RawResponse> {
        ensure_prompt(request)?;

        let body = serde_json::to_value(MessagesRequest {
            model: &self.model,
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            messages: vec![MessageParam {
                role: "user",
                content: &request.prompt,
            }],
        })?;

        let url = format!("{}/v1/messages", self.base_url);
        let raw = self
            .http
            .post_json(self.name(), &url, &self.headers(), &body)
            .await?;
        Ok(RawResponse(raw))
    }

    fn extract_text(&self, raw: RawResponse) -> ProviderResult<String> {
        let response: MessagesResponse = serde_json::from_value(raw.0)?;

        if response.stop_reason.as_deref() == Some("max_tokens") {
            return Err(ProviderError::ContentFiltered {
                reason: FilterReason::MaxTokens,
            });
        }

        match response.content.into_iter().find_map(|block| block.text) {
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

    fn adapter() -> AnthropicAdapter {
        AnthropicAdapter::new(
            SecretString::new("sk-ant-test"),
            "claude-3-5-sonnet-20241022".to_string(),
            HttpClient::new().unwrap(),
        )
    }

    #[test]
    fn test_extract_text_normal_completion() {
        let raw = RawResponse::new(json!({
            "id": "msg_01",
            "content": [{"type": "text", "text": "The examined life is worth living."}],
            "stop_reason": "end_turn"
        }));
        let text = adapter().extract_text(raw).unwrap();
        assert_eq!(text, "The examined life is worth living.");
    }

    #[test]
    fn test_extract_text_max_tokens_discards_partial() {
        let raw = RawResponse::new(json!({
            "content": [{"type": "text", "text": "Truncated mid-thou"}],
            "stop_reason": "max_tokens"
        }));
        let err = adapter().extract_text(raw).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ContentFiltered {
                reason: FilterReason::MaxTokens
            }
        ));
    }

    #[test]
    fn test_extract_text_empty_content() {
        let raw = RawResponse::new(json!({"content": [], "stop_reason": "end_turn"}));
        let err = adapter().extract_text(raw).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ContentFiltered {
                reason: FilterReason::Unrecognized
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_network() {
        let request = GenerationRequest::new("");
        let err = adapter().invoke(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyPrompt));
    }
}
