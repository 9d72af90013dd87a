//! HTTP status mapping into the provider error taxonomy

use crate::http::REQUEST_TIMEOUT_SECS;
use crate::providers::error::ProviderError;
use reqwest::StatusCode;
use serde_json::Value;

/// Map a non-success HTTP status and optional response body to a
/// `ProviderError`.
pub fn map_status(status: StatusCode, body: Option<&str>) -> ProviderError {
    let details = body
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_details(&v));

    let message = details
        .as_ref()
        .map(|d| d.message.clone())
        .or_else(|| body.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            message,
            retry_after_secs: details.and_then(|d| d.retry_after_seconds),
        },

        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::Timeout(REQUEST_TIMEOUT_SECS)
        }

        status => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Error details extracted from a response body
struct ErrorDetails {
    message: String,
    retry_after_seconds: Option<u64>,
}

/// Extract error details from a JSON error response.
///
/// Handles the formats the three backends actually use:
/// OpenAI/Anthropic `{ "error": { "message": "..." } }` and the generic
/// `{ "message": "..." }` shape Gemini wraps its status details in.
fn extract_error_details(json: &Value) -> Option<ErrorDetails> {
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
            return Some(ErrorDetails {
                message: message.to_string(),
                retry_after_seconds: error.get("retry_after").and_then(|v| v.as_u64()),
            });
        }
        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                message: message.to_string(),
                retry_after_seconds: None,
            });
        }
    }

    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(ErrorDetails {
            message: message.to_string(),
            retry_after_seconds: json.get("retry_after").and_then(|v| v.as_u64()),
        });
    }

    None
}
