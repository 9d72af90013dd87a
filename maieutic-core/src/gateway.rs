//! Provider selector / gateway
//!
//! The single entry point the dialogue layer calls. The adapter is resolved
//! and credential-checked at construction; `generate` only dispatches to the
//! retry controller with the bound adapter. Concurrent calls share nothing
//! mutable, so any number of them may be in flight at once.

use crate::config::{ConfigError, GatewayConfig};
use crate::http::HttpClient;
use crate::protocol::{GenerationOutcome, GenerationRequest};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::retry::{RetryController, RetryPolicy};
use std::fmt;
use tracing::info;

/// Gateway over one configured text-generation backend.
pub struct Gateway {
    adapter: Box<dyn ProviderAdapter>,
    controller: RetryController,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("adapter", &self.adapter.name())
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Build a gateway from a resolved configuration.
    ///
    /// Fails fast if the credential for the selected kind is missing or
    /// empty; a misconfigured gateway must never become ready to serve.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        if config.api_key.is_empty() {
            return Err(ConfigError::EmptyCredential {
                var: config.provider.api_key_var().to_string(),
            });
        }

        let http = HttpClient::new()?;
        let adapter = config.provider.create_adapter(&config, http);
        info!(
            provider = config.provider.name(),
            model = %config.model,
            "gateway ready"
        );

        Ok(Self {
            adapter,
            controller: RetryController::new(RetryPolicy::default()),
        })
    }

    /// Build a gateway from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Build a gateway around a custom adapter, e.g. one pointed at a mock
    /// server or an in-process scripted backend.
    pub fn with_adapter(adapter: Box<dyn ProviderAdapter>) -> Self {
        Self {
            adapter,
            controller: RetryController::new(RetryPolicy::default()),
        }
    }

    /// Replace the retry policy. Production keeps the default; tests shrink
    /// the backoff unit.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.controller = RetryController::new(policy);
        self
    }

    /// Generate a completion for the given prompt.
    ///
    /// Returns exactly one outcome: generated text, a success-shaped fallback
    /// sentence on content-filter events, or one of the terminal error kinds.
    pub async fn generate(&self, prompt: &str) -> GenerationOutcome {
        let request = GenerationRequest::new(prompt);
        self.controller.run(self.adapter.as_ref(), &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, ProviderKind};

    #[test]
    fn test_empty_credential_rejected_for_every_kind() {
        for kind in ProviderKind::ALL {
            let config = GatewayConfig::new(kind, "", kind.default_model());
            let err = Gateway::new(config).unwrap_err();
            match err {
                ConfigError::EmptyCredential { var } => assert_eq!(var, kind.api_key_var()),
                other => panic!("expected EmptyCredential, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_valid_config_constructs() {
        for kind in ProviderKind::ALL {
            let config = GatewayConfig::new(kind, "test-key", kind.default_model());
            assert!(Gateway::new(config).is_ok());
        }
    }
}
