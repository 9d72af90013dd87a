//! Uniform request/outcome types for the generation gateway
//!
//! These types are the contract between the dialogue layer and the provider
//! adapters. Every provider-specific wire shape is translated to and from
//! these before it crosses the adapter boundary.

use crate::providers::safety::FilterReason;

/// A single completion request, created fresh per `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The fully assembled prompt string
    pub prompt: String,

    /// Maximum number of tokens the backend may generate
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff, where the backend supports it
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff, where the backend supports it
    pub top_k: Option<u32>,
}

impl GenerationRequest {
    /// Fixed generation parameters attached to every call
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Create a request with the fixed default parameters
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
            top_p: None,
            top_k: None,
        }
    }
}

/// The single outcome of one top-level `generate` call.
///
/// Exactly one variant surfaces per call; intermediate retry failures are
/// never leaked. `Filtered` carries the caller-safe fallback sentence so the
/// dialogue layer can treat it like ordinary generated text.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The backend returned usable text
    Success(String),

    /// The backend refused or truncated the response; `text` is the fixed
    /// fallback sentence, never the partial candidate text
    Filtered { reason: FilterReason, text: String },

    /// Every attempt hit a backend throttling signal
    RateLimited,

    /// Every attempt failed with a generic backend/transport error; carries
    /// the last underlying message
    ProviderError(String),

    /// An uncategorized failure, surfaced immediately without retry
    Fatal(String),
}

impl GenerationOutcome {
    /// Text to show the user, present for both `Success` and `Filtered`.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Filtered { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether this outcome carries user-visible text.
    pub fn is_text(&self) -> bool {
        self.text().is_some()
    }
}
