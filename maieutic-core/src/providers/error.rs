//! Closed provider error taxonomy
//!
//! Every provider SDK has its own exception zoo; none of it leaks past the
//! adapter boundary. Adapters normalize backend failures into this one enum,
//! and the retry controller only ever branches on `retry_class`.

use crate::providers::safety::FilterReason;
use thiserror::Error;

/// Result type for adapter operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors produced by an adapter's `invoke`/`extract_text` pair.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The backend signalled throttling (HTTP 429 or equivalent)
    #[error("rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// The backend returned a non-success status
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection-level failure before a response was received
    #[error("network error: {0}")]
    Network(String),

    /// The transport timed out waiting for the backend
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The response exists but carries no usable text
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: FilterReason },

    /// The prompt was empty; callers must not reach the network with this
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The response body did not match the backend's documented shape
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

/// How the retry controller treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Retry with throttling backoff, scaled by attempt index
    RateLimited,

    /// Retry with a short fixed backoff
    Transient,

    /// Terminal; absorbed into a success-shaped fallback sentence
    Filtered(FilterReason),

    /// Terminal; surfaced immediately so unknown defects are not masked
    Fatal,
}

impl ProviderError {
    /// Classify this error for the retry loop.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } => RetryClass::RateLimited,
            Self::Api { .. } | Self::Network(_) | Self::Timeout(_) => RetryClass::Transient,
            Self::ContentFiltered { reason } => RetryClass::Filtered(*reason),
            Self::EmptyPrompt | Self::Parse(_) => RetryClass::Fatal,
        }
    }

    /// Backend-advertised throttle window, when the 429 body carried one.
    /// The backoff schedule stays deterministic; this is logged, not obeyed.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(crate::http::REQUEST_TIMEOUT_SECS)
        } else if err.is_connect() {
            ProviderError::Network(format!("connection failed: {}", err))
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
