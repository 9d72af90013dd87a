//! Gateway configuration
//!
//! The configuration surface is read once at process start: a provider-kind
//! selector plus, per selected kind, one credential and one model-name
//! override. A missing credential for the selected kind is fatal at
//! construction time; it never becomes a per-call error.

mod error;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use secrets::SecretString;

use std::env;
use std::str::FromStr;

/// Environment variable selecting the active provider
pub const PROVIDER_VAR: &str = "LLM_PROVIDER";

/// The supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// All supported kinds, for iteration in validation and tests.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::Gemini,
    ];

    /// Canonical lowercase name, matching the `LLM_PROVIDER` values.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Gemini => "google",
        }
    }

    /// Environment variable holding the credential for this kind.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Environment variable overriding the model name for this kind.
    pub fn model_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_MODEL",
            Self::OpenAi => "OPENAI_MODEL",
            Self::Gemini => "GOOGLE_MODEL",
        }
    }

    /// Model used when no override is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Gemini => "gemini-pro",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "google" | "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Immutable gateway configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Which backend the gateway is bound to
    pub provider: ProviderKind,

    /// Credential for the selected backend
    pub api_key: SecretString,

    /// Model name sent with every request
    pub model: String,
}

impl GatewayConfig {
    /// Create a configuration with an explicit credential and model.
    pub fn new(provider: ProviderKind, api_key: impl Into<SecretString>, model: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Resolve the configuration from the environment.
    ///
    /// `LLM_PROVIDER` selects the backend (default `anthropic`); the
    /// per-provider key variable must be present and non-empty.
    pub fn from_env() -> ConfigResult<Self> {
        let provider_name =
            env::var(PROVIDER_VAR).unwrap_or_else(|_| "anthropic".to_string());
        let provider = ProviderKind::from_str(&provider_name)?;

        let key_var = provider.api_key_var();
        let api_key = env::var(key_var).map_err(|_| ConfigError::MissingCredential {
            var: key_var.to_string(),
        })?;
        if api_key.is_empty() {
            return Err(ConfigError::EmptyCredential {
                var: key_var.to_string(),
            });
        }

        let model = env::var(provider.model_var())
            .unwrap_or_else(|_| provider.default_model().to_string());

        Ok(Self {
            provider,
            api_key: SecretString::new(api_key),
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(
            ProviderKind::from_str("anthropic").unwrap(),
            ProviderKind::Anthropic
        );
        assert_eq!(
            ProviderKind::from_str("OpenAI").unwrap(),
            ProviderKind::OpenAi
        );
        assert_eq!(
            ProviderKind::from_str("google").unwrap(),
            ProviderKind::Gemini
        );
        assert_eq!(
            ProviderKind::from_str("gemini").unwrap(),
            ProviderKind::Gemini
        );

        let err = ProviderKind::from_str("cohere").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProvider(name) if name == "cohere"));
    }

    #[test]
    fn test_default_models() {
        assert_eq!(
            ProviderKind::Anthropic.default_model(),
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(ProviderKind::OpenAi.default_model(), "gpt-4-turbo-preview");
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-pro");
    }

    #[test]
    fn test_key_vars_are_distinct() {
        let vars: Vec<_> = ProviderKind::ALL.iter().map(|k| k.api_key_var()).collect();
        assert_eq!(vars.len(), 3);
        assert!(vars.contains(&"ANTHROPIC_API_KEY"));
        assert!(vars.contains(&"OPENAI_API_KEY"));
        assert!(vars.contains(&"GOOGLE_API_KEY"));
    }

    #[test]
    fn test_explicit_config_construction() {
        let config = GatewayConfig::new(ProviderKind::OpenAi, "sk-test", "gpt-4-turbo-preview");
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.api_key.expose_secret(), "sk-test");
        assert_eq!(config.model, "gpt-4-turbo-preview");
        // Credential must not leak through Debug
        assert!(!format!("{:?}", config).contains("sk-test"));
    }
}
