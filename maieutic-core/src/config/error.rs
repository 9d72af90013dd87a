//! Configuration error types

use thiserror::Error;

/// Errors raised while resolving the gateway configuration.
///
/// All of these are construction-time failures: the gateway must never become
/// ready to serve with a broken configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("environment variable '{var}' not found")]
    MissingCredential { var: String },

    #[error("credential '{var}' is empty")]
    EmptyCredential { var: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
