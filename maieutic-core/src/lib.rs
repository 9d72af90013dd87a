//! Maieutic Core Library
//!
//! The resilient invocation layer of the Maieutic dialogue engine: it turns
//! one "generate a completion for this prompt" request into a call against
//! one of three interchangeable backends (Anthropic, OpenAI, Google Gemini),
//! behind a single uniform contract.
//!
//! The pieces, leaf-first:
//! - [`providers`]: one adapter per backend, a closed error taxonomy, the
//!   retry controller, and the content-safety normalizer
//! - [`http`]: shared reqwest client and HTTP status classification
//! - [`config`]: provider selection and credential validation at startup
//! - [`gateway`]: the `generate` entry point binding it all together
//!
//! ```no_run
//! use maieutic_core::Gateway;
//!
//! # async fn demo() -> Result<(), maieutic_core::config::ConfigError> {
//! let gateway = Gateway::from_env()?;
//! let outcome = gateway.generate("What is virtue?").await;
//! if let Some(text) = outcome.text() {
//!     println!("{}", text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod gateway;
pub mod http;
pub mod protocol;
pub mod providers;

pub use config::{GatewayConfig, ProviderKind};
pub use gateway::Gateway;
pub use protocol::{GenerationOutcome, GenerationRequest};
pub use providers::{FilterReason, RetryPolicy};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
