//! Provider abstraction layer
//!
//! This module implements the adapter seam between the uniform
//! request/outcome model and each backend's native call shape, the closed
//! error taxonomy those adapters produce, the retry controller that drives
//! them, and the content-safety normalizer.

pub mod adapter;
pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod retry;
pub mod safety;

pub use adapter::{ProviderAdapter, RawResponse};
pub use error::{ProviderError, ProviderResult, RetryClass};
pub use retry::{RetryController, RetryPolicy};
pub use safety::{fallback_text, FilterReason};

// Re-export concrete adapters
pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
