//! Constants used throughout the authnet library

use std::path::PathBuf;

/// Application name used for the config directory
pub const APP_NAME: &str = "authnet";

/// Config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Request timeout in seconds applied to every gateway call
pub const GATEWAY_TIMEOUT_SECS: u64 = 45;

/// CA bundle shipped with the crate, used when peer verification is enabled
pub const BUNDLED_CA_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/ssl/cert.pem");

/// Substring of a resolved URL marking an XML endpoint
pub const XML_ENDPOINT_MARKER: &str = "xml";

/// Content type sent to XML endpoints
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Response log block headers
pub const LOG_ERROR_HEADER: &str = "----CURL ERROR----";
pub const LOG_RESPONSE_HEADER: &str = "----Response----";

// Environment variables consulted by `GatewayConfig::from_env`
pub const ENV_API_LOGIN_ID: &str = "AUTHORIZENET_API_LOGIN_ID";
pub const ENV_TRANSACTION_KEY: &str = "AUTHORIZENET_TRANSACTION_KEY";
pub const ENV_SANDBOX: &str = "AUTHORIZENET_SANDBOX";
pub const ENV_LOG_FILE: &str = "AUTHORIZENET_LOG_FILE";

/// AIM (form-encoded) transaction endpoints
pub const AIM_SANDBOX_URL: &str = "https://test.authorize.net/gateway/transact.dll";
pub const AIM_PRODUCTION_URL: &str = "https://secure2.authorize.net/gateway/transact.dll";

/// XML API endpoints
pub const XML_API_SANDBOX_URL: &str = "https://apitest.authorize.net/xml/v1/request.api";
pub const XML_API_PRODUCTION_URL: &str = "https://api2.authorize.net/xml/v1/request.api";

/// Namespace declared on every XML API request
pub const XML_API_NAMESPACE: &str = "AnetApi/xml/v1/schema/AnetApiSchema.xsd";

/// AIM protocol version sent as `x_version`
pub const AIM_VERSION: &str = "3.1";

/// Field delimiter requested from the AIM gateway
pub const AIM_DELIMITER: char = '|';

/// Get the authnet home directory (`~/.authnet/`)
///
/// # Returns
///
/// - `Some(PathBuf)` if the home directory can be determined
/// - `None` if the home directory cannot be determined
pub fn authnet_home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(format!(".{APP_NAME}")))
}

/// Get the default config file path (`~/.authnet/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    authnet_home_dir().map(|p| p.join(CONFIG_FILE))
}
