//! Error types for the authnet library.

use thiserror::Error;

/// Result type alias for authnet operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    // ==================== Gateway Errors ====================
    #[error("Could not reach the payment gateway: {0}")]
    Transport(#[from] curl::Error),

    #[error("The gateway returned a response that could not be decoded: {0}")]
    Decode(String),

    #[error("Failed to encode the request payload: {0}")]
    Encode(String),

    // ==================== Configuration Errors ====================
    #[error("{0}")]
    ConfigMissing(String),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("Could not find config directory. Set AUTHORIZENET_* environment variables or ensure your home directory is accessible.")]
    NoConfigDir,

    #[error("Invalid config file format: {0}")]
    TomlParse(#[from] toml::de::Error),

    // ==================== External Library Errors ====================
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True when the network call itself could not complete.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True when the gateway answered but the body was not understood.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
