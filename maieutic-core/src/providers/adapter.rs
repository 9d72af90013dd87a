//! Provider adapter trait
//!
//! Defines the two-operation capability every backend adapter implements:
//! `invoke` performs one outbound call, `extract_text` interprets the raw
//! payload. The concrete adapter is chosen once at gateway construction and
//! bound for the gateway's lifetime; there is no per-call re-dispatch.

use crate::config::{GatewayConfig, ProviderKind};
use crate::http::HttpClient;
use crate::protocol::GenerationRequest;
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde_json::Value;

/// An unparsed backend response body.
///
/// Opaque to everything except the adapter that produced it; the JSON inside
/// is still in the backend's native shape.
#[derive(Debug, Clone)]
pub struct RawResponse(pub(crate) Value);

impl RawResponse {
    /// Wrap a raw JSON payload, mainly for scripted responses in tests.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Unwrap the raw JSON payload, for adapter implementations outside this
    /// crate.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Core trait all generation backends implement.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The backend's canonical lowercase name
    fn name(&self) -> &'static str;

    /// Send the request to the backend with the fixed generation parameters
    /// attached. Exactly one outbound network call. Backend-native failures
    /// are normalized into `ProviderError` here, never leaked.
    async fn invoke(&self, request: &GenerationRequest) -> ProviderResult<RawResponse>;

    /// Pull the generated text out of a raw response, or signal a
    /// content-filter condition for "200 OK, no usable content" shapes.
    fn extract_text(&self, raw: RawResponse) -> ProviderResult<String>;
}

/// Reject empty prompts before they reach the network.
pub(crate) fn ensure_prompt(request: &GenerationRequest) -> ProviderResult<()> {
    if request.prompt.is_empty() {
        Err(ProviderError::EmptyPrompt)
    } else {
        Ok(())
    }
}

impl ProviderKind {
    /// Create the adapter instance for this kind.
    pub fn create_adapter(&self, config: &GatewayConfig, http: HttpClient) -> Box<dyn ProviderAdapter> {
        match self {
            ProviderKind::Anthropic => Box::new(crate::providers::AnthropicAdapter::new(
                config.api_key.clone(),
                config.model.clone(),
                http,
            )),
            ProviderKind::OpenAi => Box::new(crate::providers::OpenAiAdapter::new(
                config.api_key.clone(),
                config.model.clone(),
                http,
            )),
            ProviderKind::Gemini => Box::new(crate::providers::GeminiAdapter::new(
                config.api_key.clone(),
                config.model.clone(),
                http,
            )),
        }
    }
}
