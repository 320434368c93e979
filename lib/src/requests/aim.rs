//! AIM transaction requests (form-encoded request, delimited response).

use super::Endpoints;
use crate::config::{Credentials, Environment};
use crate::constants::{AIM_DELIMITER, AIM_PRODUCTION_URL, AIM_SANDBOX_URL, AIM_VERSION};
use crate::error::{GatewayError, Result};
use crate::transmitter::GatewayRequest;
use std::fmt;
use std::str::FromStr;

/// Value sent as `x_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    AuthCapture,
    AuthOnly,
    PriorAuthCapture,
    CaptureOnly,
    Credit,
    Void,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::AuthCapture => "AUTH_CAPTURE",
            TransactionType::AuthOnly => "AUTH_ONLY",
            TransactionType::PriorAuthCapture => "PRIOR_AUTH_CAPTURE",
            TransactionType::CaptureOnly => "CAPTURE_ONLY",
            TransactionType::Credit => "CREDIT",
            TransactionType::Void => "VOID",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First field of every AIM response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Approved,
    Declined,
    Error,
    HeldForReview,
}

impl FromStr for ResponseCode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(ResponseCode::Approved),
            "2" => Ok(ResponseCode::Declined),
            "3" => Ok(ResponseCode::Error),
            "4" => Ok(ResponseCode::HeldForReview),
            other => Err(GatewayError::decode(format!(
                "unknown AIM response code '{other}'"
            ))),
        }
    }
}

/// A transaction posted to the AIM endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AimRequest {
    transaction_type: TransactionType,
    fields: Vec<(String, String)>,
    endpoints: Endpoints,
}

impl AimRequest {
    pub fn new(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            fields: Vec::new(),
            endpoints: Endpoints::new(AIM_SANDBOX_URL, AIM_PRODUCTION_URL),
        }
    }

    /// Set an `x_` field. The prefix is added when missing; setting a field
    /// twice keeps the last value in the original position.
    #[must_use]
    pub fn field(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref();
        let name = if name.starts_with("x_") {
            name.to_string()
        } else {
            format!("x_{name}")
        };
        let value = value.into();

        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn amount(self, amount: impl Into<String>) -> Self {
        self.field("x_amount", amount)
    }

    /// Reference an earlier transaction, as required by void and prior-auth capture.
    #[must_use]
    pub fn transaction_id(self, id: impl Into<String>) -> Self {
        self.field("x_trans_id", id)
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl GatewayRequest for AimRequest {
    type Response = AimResponse;

    fn build_payload(&self, credentials: &Credentials) -> Result<String> {
        let delimiter = AIM_DELIMITER.to_string();
        let mut pairs: Vec<(&str, &str)> = vec![
            ("x_version", AIM_VERSION),
            ("x_delim_data", "TRUE"),
            ("x_delim_char", delimiter.as_str()),
            ("x_relay_response", "FALSE"),
            ("x_login", credentials.api_login_id.as_str()),
            ("x_tran_key", credentials.transaction_key.as_str()),
            ("x_type", self.transaction_type.as_str()),
        ];
        pairs.extend(self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        serde_urlencoded::to_string(&pairs).map_err(|e| GatewayError::encode(e.to_string()))
    }

    fn resolve_endpoint(&self, environment: Environment) -> String {
        self.endpoints.select(environment).to_string()
    }

    fn parse_response(&self, raw: &str) -> Result<AimResponse> {
        raw.parse()
    }
}

/// Decoded AIM response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AimResponse {
    pub response_code: ResponseCode,
    pub response_subcode: String,
    pub reason_code: u32,
    pub reason_text: String,
    pub authorization_code: String,
    pub avs_response: String,
    pub transaction_id: String,
    pub amount: Option<String>,
    pub transaction_type: Option<String>,
    /// Every field as returned, in gateway order
    pub fields: Vec<String>,
}

impl AimResponse {
    /// Fields every response carries
    pub const MIN_FIELDS: usize = 7;

    pub fn is_approved(&self) -> bool {
        self.response_code == ResponseCode::Approved
    }

    /// Field by its 1-based position in the AIM response guide.
    pub fn field(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }
}

impl FromStr for AimResponse {
    type Err = GatewayError;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim_end_matches(&['\r', '\n'][..]);
        if raw.is_empty() {
            return Err(GatewayError::decode("empty AIM response"));
        }

        let fields: Vec<String> = raw.split(AIM_DELIMITER).map(str::to_string).collect();
        if fields.len() < Self::MIN_FIELDS {
            return Err(GatewayError::decode(format!(
                "AIM response has {} fields, expected at least {}",
                fields.len(),
                Self::MIN_FIELDS
            )));
        }

        let reason_code = fields[2].trim().parse::<u32>().map_err(|_| {
            GatewayError::decode(format!("invalid AIM reason code '{}'", fields[2]))
        })?;

        let optional = |i: usize| fields.get(i).filter(|s| !s.is_empty()).cloned();

        Ok(AimResponse {
            response_code: fields[0].parse()?,
            response_subcode: fields[1].clone(),
            reason_code,
            reason_text: fields[3].clone(),
            authorization_code: fields[4].clone(),
            avs_response: fields[5].clone(),
            transaction_id: fields[6].clone(),
            amount: optional(9),
            transaction_type: optional(11),
            fields,
        })
    }
}
