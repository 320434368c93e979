//! Concrete gateway requests.
//!
//! - [`AimRequest`] - form-encoded transaction request, `|`-delimited reply
//! - [`TransactionDetailsRequest`] - XML API reporting request, XML reply

mod aim;
mod transaction_details;

pub use aim::{AimRequest, AimResponse, ResponseCode, TransactionType};
pub use transaction_details::{
    ApiMessage, ApiMessages, MessageType, TransactionDetails, TransactionDetailsRequest,
    TransactionDetailsResponse,
};

use crate::config::Environment;

/// Sandbox and production URLs for one gateway service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub sandbox: String,
    pub production: String,
}

impl Endpoints {
    pub fn new(sandbox: impl Into<String>, production: impl Into<String>) -> Self {
        Self {
            sandbox: sandbox.into(),
            production: production.into(),
        }
    }

    pub fn select(&self, environment: Environment) -> &str {
        match environment {
            Environment::Sandbox => &self.sandbox,
            Environment::Production => &self.production,
        }
    }
}
