//! HTTP transport implementation using curl.

use crate::error::Result;
use curl::easy::{Easy2, Handler, List, WriteError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

struct ResponseHandler {
    data: Vec<u8>,
    headers: HashMap<String, String>,
}

impl ResponseHandler {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            headers: HashMap::new(),
        }
    }
}

impl Handler for ResponseHandler {
    fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn header(&mut self, header: &[u8]) -> bool {
        if let Ok(header_str) = std::str::from_utf8(header) {
            if let Some((key, value)) = header_str.split_once(':') {
                self.headers
                    .insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status_code: u32,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as text, replacing invalid UTF-8 sequences.
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}

/// Certificate checks applied to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOptions {
    /// Verify the peer certificate chain
    pub verify_peer: bool,
    /// Verify the certificate matches the host name
    pub verify_host: bool,
    /// Trust anchors used when `verify_peer` is set
    pub ca_file: Option<PathBuf>,
}

impl TlsOptions {
    /// Peer and host verification against the given CA file.
    pub fn verified(ca_file: impl Into<PathBuf>) -> Self {
        Self {
            verify_peer: true,
            verify_host: true,
            ca_file: Some(ca_file.into()),
        }
    }

    /// Host name verification only; no CA file is consulted.
    pub fn host_only() -> Self {
        Self {
            verify_peer: false,
            verify_host: true,
            ca_file: None,
        }
    }
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self::verified(crate::constants::BUNDLED_CA_FILE)
    }
}

/// A fully resolved POST, handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub tls: TlsOptions,
}

impl TransportRequest {
    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Performs a single POST and returns the complete response.
///
/// Implementations must not retry; a failed attempt is reported as
/// [`GatewayError::Transport`](crate::GatewayError::Transport).
pub trait Transport {
    fn execute(&self, request: &TransportRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &TransportRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Default transport: one libcurl easy handle per request.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    verbose: bool,
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dump libcurl's connection trace to stderr.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Override the default `authnet-rs/<version>` User-Agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Transport for CurlTransport {
    fn execute(&self, request: &TransportRequest) -> Result<HttpResponse> {
        let mut builder = HttpClientBuilder::new()
            .verbose(self.verbose)
            .timeout(request.timeout)
            .tls(request.tls.clone());
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // The handle lives only for this call and is dropped on every path.
        let mut client = builder.build()?;
        client.post(&request.url, &request.body)
    }
}

/// Builder for configuring HTTP clients.
#[must_use]
pub struct HttpClientBuilder {
    verbose: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tls: TlsOptions,
    headers: Vec<(String, String)>,
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder with default settings.
    pub fn new() -> Self {
        Self {
            verbose: false,
            timeout: None,
            user_agent: None,
            tls: TlsOptions::default(),
            headers: Vec::new(),
        }
    }

    /// Enable verbose output for debugging.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set custom User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set certificate verification options.
    pub fn tls(mut self, tls: TlsOptions) -> Self {
        self.tls = tls;
        self
    }

    /// Add a custom HTTP header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<HttpClient> {
        let mut client = HttpClient::new();

        if self.verbose {
            client.set_verbose(true)?;
        }

        if let Some(timeout) = self.timeout {
            client.set_timeout(timeout)?;
        }

        let ua = self
            .user_agent
            .unwrap_or_else(|| format!("authnet-rs/{}", crate::VERSION));
        client.set_user_agent(&ua)?;

        client.set_tls(&self.tls)?;

        if !self.headers.is_empty() {
            client.set_headers(&self.headers)?;
        }

        Ok(client)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HttpClient {
    curl: Easy2<ResponseHandler>,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            curl: Easy2::new(ResponseHandler::new()),
        }
    }

    pub fn set_headers(&mut self, headers: &[(String, String)]) -> Result<()> {
        let mut list = List::new();
        for (name, value) in headers {
            list.append(&format!("{name}: {value}"))?;
        }
        self.curl.http_headers(list)?;
        Ok(())
    }

    /// Set verbose mode
    pub fn set_verbose(&mut self, verbose: bool) -> Result<()> {
        self.curl.verbose(verbose)?;
        Ok(())
    }

    /// Set timeout
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.curl.timeout(timeout)?;
        Ok(())
    }

    /// Set user agent
    pub fn set_user_agent(&mut self, user_agent: &str) -> Result<()> {
        self.curl.useragent(user_agent)?;
        Ok(())
    }

    /// Apply certificate verification options
    pub fn set_tls(&mut self, tls: &TlsOptions) -> Result<()> {
        self.curl.ssl_verify_host(tls.verify_host)?;
        if tls.verify_peer {
            self.curl.ssl_verify_peer(true)?;
            if let Some(ca) = &tls.ca_file {
                self.curl.cainfo(ca)?;
            }
        } else {
            self.curl.ssl_verify_peer(false)?;
        }
        Ok(())
    }

    /// Perform a POST request with the given body
    pub fn post(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse> {
        self.curl.url(url)?;
        self.curl.post(true)?;
        self.curl.post_field_size(body.len() as u64)?;
        self.curl.post_fields_copy(body)?;
        self.perform()
    }

    /// Perform the request and return the response
    fn perform(&mut self) -> Result<HttpResponse> {
        self.curl.perform()?;

        let status_code = self.curl.response_code()?;

        let handler = self.curl.get_mut();

        Ok(HttpResponse {
            status_code,
            headers: std::mem::take(&mut handler.headers),
            body: std::mem::take(&mut handler.data),
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
