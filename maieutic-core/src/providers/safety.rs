//! Content-safety normalization
//!
//! Generation backends routinely return "200 OK, no usable content" instead
//! of an error code: a prompt-level block before any candidate is produced, a
//! non-normal finish reason on the best candidate, or a response shape with
//! no candidates at all. This module folds those provider-specific signals
//! into one `FilterReason` and maps each reason to a fixed, caller-safe
//! fallback sentence. Callers never see a filter event as a hard error.

use std::fmt;

/// Why a backend response was withheld or truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    /// The prompt was blocked before any candidate was generated
    PromptBlocked,

    /// The best candidate was stopped by a safety filter
    Safety,

    /// Generation hit the maximum output length; partial text is discarded
    /// rather than surfaced mid-thought
    MaxTokens,

    /// The candidate was flagged for recitation/copyright
    Recitation,

    /// The backend reported an unspecified non-normal finish reason
    Other,

    /// The response shape had no candidates and no plain-text fallback field
    Unrecognized,
}

impl FilterReason {
    /// Short phrase used inside the incomplete-response fallback sentence.
    fn phrase(&self) -> &'static str {
        match self {
            Self::PromptBlocked => "blocked by content filters",
            Self::Safety => "blocked by safety filters",
            Self::MaxTokens => "hit max tokens limit",
            Self::Recitation => "recitation issue",
            Self::Other => "other reason",
            Self::Unrecognized => "unknown reason",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Fallback for a prompt-level block.
pub const BLOCKED_FALLBACK: &str = "I apologize, but I cannot provide a response to this query. \
     Please try rephrasing your question or asking about a different topic.";

/// Fallback for a response shape with nothing usable in it.
pub const EMPTY_FALLBACK: &str = "I apologize, but I couldn't generate a proper response. \
     Please try again with a different question.";

/// The fixed sentence returned to callers for a given filter reason.
pub fn fallback_text(reason: FilterReason) -> String {
    match reason {
        FilterReason::PromptBlocked => BLOCKED_FALLBACK.to_string(),
        FilterReason::Unrecognized => EMPTY_FALLBACK.to_string(),
        reason => format!(
            "I apologize, but I couldn't provide a complete response ({}). \
             Please try rephrasing your question.",
            reason
        ),
    }
}
