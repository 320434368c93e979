//! Request transmitter - builds, sends and decodes gateway requests
//!
//! Every gateway request type implements [`GatewayRequest`], which supplies the
//! three request-specific steps: payload encoding, endpoint selection and
//! response decoding. [`RequestTransmitter`] drives those steps around a
//! single HTTPS POST.

use crate::config::{Credentials, Environment, GatewayConfig};
use crate::constants::{GATEWAY_TIMEOUT_SECS, XML_CONTENT_TYPE};
use crate::error::{GatewayError, Result};
use crate::http::{CurlTransport, HttpResponse, TlsOptions, Transport, TransportRequest};
use crate::response_log::ResponseLog;
use crate::utils::is_xml_endpoint;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Request-specific behavior plugged into the [`RequestTransmitter`].
pub trait GatewayRequest {
    /// Structured result decoded from the gateway's reply
    type Response;

    /// Encode the outgoing body in this request's wire format.
    fn build_payload(&self, credentials: &Credentials) -> Result<String>;

    /// URL this request is posted to in the given environment.
    fn resolve_endpoint(&self, environment: Environment) -> String;

    /// Decode the raw response body.
    ///
    /// Must fail with [`GatewayError::Decode`] rather than return a partially
    /// populated response.
    fn parse_response(&self, raw: &str) -> Result<Self::Response>;
}

/// Sends one [`GatewayRequest`] to the gateway.
///
/// # Example
/// ```no_run
/// # use authnet_lib::{AimRequest, GatewayConfig, RequestTransmitter, TransactionType};
/// # fn example() -> authnet_lib::Result<()> {
/// let config = GatewayConfig::from_env()?;
/// let request = AimRequest::new(TransactionType::AuthCapture)
///     .amount("5.00")
///     .field("x_card_num", "4007000000027")
///     .field("x_exp_date", "0430");
///
/// let mut transmitter = RequestTransmitter::new(config, request)
///     .with_sandbox(true)
///     .with_log_file("/tmp/authnet.log");
/// let response = transmitter.send()?;
/// println!("{}", response.reason_text);
/// # Ok(())
/// # }
/// ```
pub struct RequestTransmitter<R, T = CurlTransport> {
    request: R,
    config: GatewayConfig,
    transport: T,
    post_string: Option<String>,
}

impl<R: GatewayRequest> RequestTransmitter<R, CurlTransport> {
    /// Create a transmitter using the curl transport.
    pub fn new(config: GatewayConfig, request: R) -> Self {
        Self {
            request,
            config,
            transport: CurlTransport::new(),
            post_string: None,
        }
    }

    /// Create a transmitter with explicit credentials and every other setting
    /// taken from `AUTHORIZENET_*` environment variables.
    pub fn with_credentials(credentials: Credentials, request: R) -> Result<Self> {
        let config = GatewayConfig {
            credentials,
            ..GatewayConfig::from_env()?
        };
        Ok(Self::new(config, request))
    }
}

impl<R: GatewayRequest, T: Transport> RequestTransmitter<R, T> {
    /// Replace the transport used for the HTTP call.
    pub fn with_transport<U: Transport>(self, transport: U) -> RequestTransmitter<R, U> {
        RequestTransmitter {
            request: self.request,
            config: self.config,
            transport,
            post_string: self.post_string,
        }
    }

    /// Select the sandbox (`true`) or production (`false`) host.
    #[must_use]
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Append raw responses to the given file.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    /// Enable or disable peer certificate verification.
    #[must_use]
    pub fn with_verify_peer(mut self, verify: bool) -> Self {
        self.config.verify_peer = verify;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    pub fn into_request(self) -> R {
        self.request
    }

    /// The payload built by the most recent [`send`](Self::send).
    pub fn post_string(&self) -> Option<&str> {
        self.post_string.as_deref()
    }

    /// The URL the next send will post to.
    pub fn endpoint(&self) -> String {
        self.request.resolve_endpoint(self.config.environment())
    }

    fn tls_options(&self) -> TlsOptions {
        match self.config.ca_file() {
            Some(ca) => TlsOptions::verified(ca),
            None => TlsOptions::host_only(),
        }
    }

    /// Post the request to the gateway and decode the response.
    ///
    /// # Errors
    /// - [`GatewayError::Transport`] when the HTTP call cannot complete
    /// - [`GatewayError::Decode`] when the body does not match the request's format
    /// - [`GatewayError::Encode`] when the payload cannot be built
    pub fn send(&mut self) -> Result<R::Response> {
        self.post_string = None;
        let payload = self.request.build_payload(&self.config.credentials)?;
        let url = self.request.resolve_endpoint(self.config.environment());

        let mut headers = Vec::new();
        if is_xml_endpoint(&url) {
            headers.push(("Content-Type".to_string(), XML_CONTENT_TYPE.to_string()));
        }

        let transport_request = TransportRequest {
            url,
            body: payload.clone().into_bytes(),
            headers,
            timeout: Duration::from_secs(GATEWAY_TIMEOUT_SECS),
            tls: self.tls_options(),
        };
        self.post_string = Some(payload);

        debug!(
            environment = %self.config.environment(),
            url = %transport_request.url,
            payload_bytes = transport_request.body.len(),
            verify_peer = transport_request.tls.verify_peer,
            "sending gateway request"
        );

        let outcome = self.transport.execute(&transport_request);

        if let Err(e) = &outcome {
            warn!(url = %transport_request.url, error = %e, "gateway request failed");
        }

        if let Some(path) = &self.config.log_file {
            record_exchange(&ResponseLog::new(path), &outcome);
        }

        let response = outcome?;
        debug!(
            status = response.status_code,
            content_type = response.get_header("content-type").map_or("", String::as_str),
            body_bytes = response.body.len(),
            "gateway responded"
        );

        let raw = String::from_utf8(response.body)
            .map_err(|e| GatewayError::decode(format!("response is not valid UTF-8: {e}")))?;
        self.request.parse_response(&raw)
    }
}

// Log write failures are reported but never mask the gateway outcome.
fn record_exchange(log: &ResponseLog, outcome: &Result<HttpResponse>) {
    let body = match outcome {
        Ok(response) => response.body_lossy(),
        Err(err) => {
            let message = match err {
                GatewayError::Transport(curl_err) => curl_err.to_string(),
                other => other.to_string(),
            };
            if let Err(e) = log.append_error(&message) {
                warn!(path = %log.path().display(), error = %e, "failed to write response log");
            }
            String::new()
        }
    };

    if let Err(e) = log.append_response(&body) {
        warn!(path = %log.path().display(), error = %e, "failed to write response log");
    }
}
