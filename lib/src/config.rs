//! Configuration management for authnet.

use crate::constants::{ENV_API_LOGIN_ID, ENV_LOG_FILE, ENV_SANDBOX, ENV_TRANSACTION_KEY};
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which gateway host a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Merchant API credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// The merchant's API Login ID
    #[serde(default)]
    pub api_login_id: String,
    /// The merchant's Transaction Key
    #[serde(default)]
    pub transaction_key: String,
}

impl Credentials {
    pub fn new(api_login_id: impl Into<String>, transaction_key: impl Into<String>) -> Self {
        Self {
            api_login_id: api_login_id.into(),
            transaction_key: transaction_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_login_id.is_empty() || self.transaction_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_login_id", &self.api_login_id)
            .field("transaction_key", &crate::utils::mask_secret(&self.transaction_key))
            .finish()
    }
}

fn default_true() -> bool {
    true
}

/// Everything a transmitter needs besides the request itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub credentials: Credentials,
    /// Send to the sandbox host instead of production
    #[serde(default = "default_true")]
    pub sandbox: bool,
    /// Append raw responses (and transport errors) to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Verify the gateway certificate chain. Host name verification is always on.
    #[serde(default = "default_true")]
    pub verify_peer: bool,
    /// Replaces the bundled CA file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            sandbox: true,
            log_file: None,
            verify_peer: true,
            ca_bundle: None,
        }
    }
}

/// Builder for creating GatewayConfig instances
///
/// Values set explicitly override whatever the builder was seeded with.
///
/// # Examples
///
/// ```no_run
/// use authnet_lib::config::ConfigBuilder;
///
/// let config = ConfigBuilder::from_env()
///     .unwrap()
///     .api_login_id("5KP3u95bQpv")
///     .transaction_key("346HZ32z3fP4hTG2")
///     .sandbox(true)
///     .log_file("/tmp/authnet.log")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: GatewayConfig,
}

impl ConfigBuilder {
    /// Create a new config builder with library defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from `AUTHORIZENET_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            config: GatewayConfig::from_env()?,
        })
    }

    /// Seed the builder from an existing config
    #[must_use]
    pub fn from_config(config: GatewayConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn api_login_id(mut self, value: impl Into<String>) -> Self {
        self.config.credentials.api_login_id = value.into();
        self
    }

    #[must_use]
    pub fn transaction_key(mut self, value: impl Into<String>) -> Self {
        self.config.credentials.transaction_key = value.into();
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    #[must_use]
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.config.verify_peer = verify;
        self
    }

    #[must_use]
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ca_bundle = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<GatewayConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl GatewayConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Resolve defaults from the process environment.
    ///
    /// Missing credentials fall back to empty strings, a missing sandbox flag
    /// to `true`, and a missing log file to no logging.
    pub fn from_env() -> Result<Self> {
        let sandbox = match std::env::var(ENV_SANDBOX) {
            Ok(value) => parse_flag(ENV_SANDBOX, &value)?,
            Err(_) => true,
        };

        let log_file = std::env::var_os(ENV_LOG_FILE)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            credentials: Credentials {
                api_login_id: std::env::var(ENV_API_LOGIN_ID).unwrap_or_default(),
                transaction_key: std::env::var(ENV_TRANSACTION_KEY).unwrap_or_default(),
            },
            sandbox,
            log_file,
            ..Default::default()
        })
    }

    /// Load config from the specified path or default location (~/.authnet/config.toml)
    pub fn load_from(config_path: Option<impl AsRef<Path>>) -> Result<Self> {
        let config_path = if let Some(path) = config_path {
            PathBuf::from(path.as_ref())
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Err(GatewayError::ConfigMissing(format!(
                "Config file not found at {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            GatewayError::ConfigMissing(format!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: GatewayConfig = toml::from_str(&content)?;

        config.validate().map_err(|e| {
            GatewayError::InvalidConfig(format!(
                "Invalid configuration in {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Load config from the default location (~/.authnet/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_from(None::<&str>)
    }

    /// Get the default config file path (~/.authnet/config.toml)
    pub fn default_config_path() -> Result<PathBuf> {
        crate::constants::default_config_path().ok_or(GatewayError::NoConfigDir)
    }

    pub fn environment(&self) -> Environment {
        Environment::from_sandbox_flag(self.sandbox)
    }

    /// CA file used for peer verification, `None` when peer verification is off
    pub fn ca_file(&self) -> Option<PathBuf> {
        if !self.verify_peer {
            return None;
        }
        Some(
            self.ca_bundle
                .clone()
                .unwrap_or_else(|| PathBuf::from(crate::constants::BUNDLED_CA_FILE)),
        )
    }

    /// Validate the configuration.
    ///
    /// Empty credentials are allowed; the gateway rejects them itself.
    pub fn validate(&self) -> Result<()> {
        if let Some(ca) = &self.ca_bundle {
            if !ca.exists() {
                return Err(GatewayError::invalid_config(format!(
                    "CA bundle not found: {}",
                    ca.display()
                )));
            }
        }
        if let Some(log) = &self.log_file {
            if log.as_os_str().is_empty() {
                return Err(GatewayError::invalid_config("Log file path is empty"));
            }
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GatewayError::invalid_config(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_full() {
        let toml = r#"
            sandbox = false
            log_file = "/var/log/authnet.log"
            verify_peer = false

            [credentials]
            api_login_id = "login"
            transaction_key = "key"
        "#;

        let config: GatewayConfig = toml::from_str(toml).expect("should parse");
        assert_eq!(config.credentials, Credentials::new("login", "key"));
        assert!(!config.sandbox);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/authnet.log")));
        assert!(!config.verify_peer);
        assert_eq!(config.environment(), Environment::Production);
    }

    #[test]
    fn test_parse_config_defaults() {
        let config: GatewayConfig = toml::from_str("").expect("should parse");
        assert!(config.sandbox);
        assert!(config.verify_peer);
        assert!(config.log_file.is_none());
        assert!(config.credentials.is_empty());
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_parse_config_rejects_unknown_credential_fields() {
        let toml = r#"
            [credentials]
            password = "hunter2"
        "#;

        let result: std::result::Result<GatewayConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "Should reject unknown field 'password'");
    }

    #[test]
    fn test_ca_file_follows_verify_peer() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.ca_file(),
            Some(PathBuf::from(crate::constants::BUNDLED_CA_FILE))
        );

        let config = GatewayConfig {
            verify_peer: false,
            ..Default::default()
        };
        assert_eq!(config.ca_file(), None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .api_login_id("id")
            .transaction_key("key")
            .sandbox(false)
            .log_file("/tmp/gateway.log")
            .build()
            .unwrap();

        assert_eq!(config.credentials.api_login_id, "id");
        assert_eq!(config.credentials.transaction_key, "key");
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/gateway.log")));
    }

    #[test]
    fn test_builder_rejects_missing_ca_bundle() {
        let result = ConfigBuilder::new()
            .ca_bundle("/definitely/not/here/cert.pem")
            .build();
        assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(parse_flag("X", " 1 ").unwrap());
        assert!(!parse_flag("X", "no").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_credentials_debug_masks_key() {
        let creds = Credentials::new("login", "346HZ32z3fP4hTG2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("login"));
        assert!(!debug.contains("346HZ32z3fP4hTG2"));
    }
}
