//! Tests for gateway construction and configuration resolution

use maieutic_core::config::{ConfigError, GatewayConfig, ProviderKind, PROVIDER_VAR};
use maieutic_core::Gateway;
use std::env;
use std::sync::Mutex;

// Environment-variable tests mutate shared process state; serialize them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_provider_env() {
    env::remove_var(PROVIDER_VAR);
    for kind in ProviderKind::ALL {
        env::remove_var(kind.api_key_var());
        env::remove_var(kind.model_var());
    }
}

#[test]
fn missing_credential_fails_construction_for_every_kind() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_provider_env();

    for kind in ProviderKind::ALL {
        env::set_var(PROVIDER_VAR, kind.name());
        let err = Gateway::from_env().unwrap_err();
        match err {
            ConfigError::MissingCredential { var } => assert_eq!(var, kind.api_key_var()),
            other => panic!("expected MissingCredential for {:?}, got {:?}", kind, other),
        }
    }

    clear_provider_env();
}

#[test]
fn empty_credential_fails_construction() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_provider_env();

    env::set_var(PROVIDER_VAR, "openai");
    env::set_var("OPENAI_API_KEY", "");
    let err = Gateway::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::EmptyCredential { var } if var == "OPENAI_API_KEY"
    ));

    clear_provider_env();
}

#[test]
fn unsupported_provider_kind_fails_construction() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_provider_env();

    env::set_var(PROVIDER_VAR, "parrot");
    let err = Gateway::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnsupportedProvider(name) if name == "parrot"
    ));

    clear_provider_env();
}

#[test]
fn provider_defaults_to_anthropic() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_provider_env();

    env::set_var("ANTHROPIC_API_KEY", "sk-ant-test");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.provider, ProviderKind::Anthropic);
    assert_eq!(config.model, "claude-3-5-sonnet-20241022");

    clear_provider_env();
}

#[test]
fn model_override_is_respected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_provider_env();

    env::set_var(PROVIDER_VAR, "google");
    env::set_var("GOOGLE_API_KEY", "test-key");
    env::set_var("GOOGLE_MODEL", "gemini-1.5-pro");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.provider, ProviderKind::Gemini);
    assert_eq!(config.model, "gemini-1.5-pro");

    clear_provider_env();
}

#[test]
fn explicit_config_with_credential_constructs() {
    let config = GatewayConfig::new(ProviderKind::Anthropic, "sk-ant-test", "claude-3-5-sonnet-20241022");
    assert!(Gateway::new(config).is_ok());
}

#[test]
fn explicit_config_without_credential_is_rejected() {
    let config = GatewayConfig::new(ProviderKind::Gemini, "", "gemini-pro");
    let err = Gateway::new(config).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::EmptyCredential { var } if var == "GOOGLE_API_KEY"
    ));
}
