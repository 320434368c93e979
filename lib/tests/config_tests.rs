//! Integration tests for configuration management

mod common;

use authnet_lib::constants::{ENV_API_LOGIN_ID, ENV_LOG_FILE, ENV_SANDBOX, ENV_TRANSACTION_KEY};
use authnet_lib::{
    AimRequest, ConfigBuilder, Credentials, Environment, GatewayConfig, GatewayError,
    RequestTransmitter, TransactionType,
};
use common::{TEST_KEY, TEST_LOGIN};
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    for name in [ENV_API_LOGIN_ID, ENV_TRANSACTION_KEY, ENV_SANDBOX, ENV_LOG_FILE] {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_env();
    let config = GatewayConfig::from_env().unwrap();

    assert_eq!(config.credentials, Credentials::new("", ""));
    assert!(config.sandbox);
    assert!(config.log_file.is_none());
    assert!(config.verify_peer);
}

#[test]
#[serial]
fn test_from_env_reads_all_variables() {
    clear_env();
    std::env::set_var(ENV_API_LOGIN_ID, TEST_LOGIN);
    std::env::set_var(ENV_TRANSACTION_KEY, TEST_KEY);
    std::env::set_var(ENV_SANDBOX, "false");
    std::env::set_var(ENV_LOG_FILE, "/tmp/authnet.log");

    let config = GatewayConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.credentials, Credentials::new(TEST_LOGIN, TEST_KEY));
    assert_eq!(config.environment(), Environment::Production);
    assert_eq!(config.log_file, Some(PathBuf::from("/tmp/authnet.log")));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_sandbox_flag() {
    clear_env();
    std::env::set_var(ENV_SANDBOX, "sometimes");
    let result = GatewayConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_explicit_values_override_env_defaults() {
    clear_env();
    std::env::set_var(ENV_API_LOGIN_ID, "from-env");
    std::env::set_var(ENV_TRANSACTION_KEY, "env-key");

    let config = ConfigBuilder::from_env()
        .unwrap()
        .api_login_id("explicit")
        .build()
        .unwrap();
    clear_env();

    assert_eq!(config.credentials.api_login_id, "explicit");
    assert_eq!(config.credentials.transaction_key, "env-key");
}

#[test]
#[serial]
fn test_transmitter_with_credentials_takes_other_settings_from_env() {
    clear_env();
    std::env::set_var(ENV_API_LOGIN_ID, "ignored");
    std::env::set_var(ENV_SANDBOX, "0");

    let transmitter = RequestTransmitter::with_credentials(
        Credentials::new(TEST_LOGIN, TEST_KEY),
        AimRequest::new(TransactionType::AuthCapture),
    )
    .unwrap();
    clear_env();

    assert_eq!(transmitter.config().credentials.api_login_id, TEST_LOGIN);
    assert!(!transmitter.config().sandbox);
    assert_eq!(
        transmitter.endpoint(),
        authnet_lib::constants::AIM_PRODUCTION_URL
    );
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
sandbox = false
log_file = "/var/log/authnet.log"

[credentials]
api_login_id = "5KP3u95bQpv"
transaction_key = "346HZ32z3fP4hTG2"
"#,
    )
    .unwrap();

    let config = GatewayConfig::load_from(Some(&path)).unwrap();
    assert_eq!(config.credentials, Credentials::new(TEST_LOGIN, TEST_KEY));
    assert!(!config.sandbox);
    assert!(config.verify_peer);
    assert_eq!(config.log_file, Some(PathBuf::from("/var/log/authnet.log")));
}

#[test]
fn test_load_from_missing_file() {
    let temp = TempDir::new().unwrap();
    let result = GatewayConfig::load_from(Some(temp.path().join("nope.toml")));
    assert!(matches!(result, Err(GatewayError::ConfigMissing(_))));
}

#[test]
fn test_load_from_invalid_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "sandbox = \"not a bool\"").unwrap();

    let result = GatewayConfig::load_from(Some(&path));
    assert!(matches!(result, Err(GatewayError::TomlParse(_))));
}

#[test]
fn test_load_from_rejects_missing_ca_bundle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "ca_bundle = \"/no/such/ca.pem\"").unwrap();

    let result = GatewayConfig::load_from(Some(&path));
    assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
}
