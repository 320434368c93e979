//! `getTransactionDetailsRequest` on the XML API.

use super::Endpoints;
use crate::config::{Credentials, Environment};
use crate::constants::{XML_API_NAMESPACE, XML_API_PRODUCTION_URL, XML_API_SANDBOX_URL};
use crate::error::{GatewayError, Result};
use crate::transmitter::GatewayRequest;
use crate::utils::{ensure_well_formed_xml, strip_bom};
use serde::{Deserialize, Serialize};

const ROOT: &str = "getTransactionDetailsRequest";
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Look up a single transaction by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetailsRequest {
    trans_id: String,
    ref_id: Option<String>,
    endpoints: Endpoints,
}

impl TransactionDetailsRequest {
    pub fn new(trans_id: impl Into<String>) -> Self {
        Self {
            trans_id: trans_id.into(),
            ref_id: None,
            endpoints: Endpoints::new(XML_API_SANDBOX_URL, XML_API_PRODUCTION_URL),
        }
    }

    /// Merchant reference echoed back in the response.
    #[must_use]
    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn trans_id(&self) -> &str {
        &self.trans_id
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'a str,
    merchant_authentication: MerchantAuthentication<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ref_id: Option<&'a str>,
    trans_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantAuthentication<'a> {
    name: &'a str,
    transaction_key: &'a str,
}

impl GatewayRequest for TransactionDetailsRequest {
    type Response = TransactionDetailsResponse;

    fn build_payload(&self, credentials: &Credentials) -> Result<String> {
        let body = RequestBody {
            xmlns: XML_API_NAMESPACE,
            merchant_authentication: MerchantAuthentication {
                name: &credentials.api_login_id,
                transaction_key: &credentials.transaction_key,
            },
            ref_id: self.ref_id.as_deref(),
            trans_id: &self.trans_id,
        };

        let xml = quick_xml::se::to_string_with_root(ROOT, &body)
            .map_err(|e| GatewayError::encode(e.to_string()))?;
        Ok(format!("{XML_DECLARATION}{xml}"))
    }

    fn resolve_endpoint(&self, environment: Environment) -> String {
        self.endpoints.select(environment).to_string()
    }

    fn parse_response(&self, raw: &str) -> Result<TransactionDetailsResponse> {
        TransactionDetailsResponse::from_xml(raw)
    }
}

/// `resultCode` of an XML API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessages {
    pub result_code: String,
    #[serde(rename = "message", default)]
    pub messages: Vec<ApiMessage>,
}

impl ApiMessages {
    pub fn result(&self) -> Option<MessageType> {
        match self.result_code.as_str() {
            "Ok" => Some(MessageType::Ok),
            "Error" => Some(MessageType::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    pub code: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub trans_id: String,
    #[serde(default)]
    pub ref_trans_id: Option<String>,
    #[serde(rename = "submitTimeUTC", default)]
    pub submit_time_utc: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub response_code: Option<u32>,
    #[serde(default)]
    pub auth_code: Option<String>,
    #[serde(default)]
    pub auth_amount: Option<String>,
    #[serde(default)]
    pub settle_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsResponse {
    #[serde(default)]
    pub ref_id: Option<String>,
    pub messages: ApiMessages,
    #[serde(default)]
    pub transaction: Option<TransactionDetails>,
}

impl TransactionDetailsResponse {
    pub fn from_xml(raw: &str) -> Result<Self> {
        let raw = strip_bom(raw).trim();
        if raw.is_empty() {
            return Err(GatewayError::decode("empty XML response"));
        }
        ensure_well_formed_xml(raw)?;

        let response: TransactionDetailsResponse = quick_xml::de::from_str(raw)
            .map_err(|e| GatewayError::decode(format!("invalid XML response: {e}")))?;

        if response.messages.result().is_none() {
            return Err(GatewayError::decode(format!(
                "unknown resultCode '{}'",
                response.messages.result_code
            )));
        }
        Ok(response)
    }

    pub fn is_ok(&self) -> bool {
        self.messages.result() == Some(MessageType::Ok)
    }

    /// First message code, e.g. `I00001` or `E00040`.
    pub fn message_code(&self) -> Option<&str> {
        self.messages.messages.first().map(|m| m.code.as_str())
    }
}
