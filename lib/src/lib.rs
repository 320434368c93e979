//! authnet-lib - Library for sending requests to the Authorize.Net gateways
//!
//! Each gateway request type implements [`GatewayRequest`] and is sent with a
//! [`RequestTransmitter`], which builds the payload, posts it over HTTPS with
//! certificate verification, optionally logs the raw exchange, and decodes
//! the reply.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod requests;
pub mod response_log;
pub mod transmitter;
pub mod utils;

pub use config::{ConfigBuilder, Credentials, Environment, GatewayConfig};
pub use error::{GatewayError, Result};
pub use http::{
    CurlTransport, HttpClient, HttpClientBuilder, HttpResponse, TlsOptions, Transport,
    TransportRequest,
};
pub use requests::{
    AimRequest, AimResponse, Endpoints, ResponseCode, TransactionDetailsRequest,
    TransactionDetailsResponse, TransactionType,
};
pub use response_log::ResponseLog;
pub use transmitter::{GatewayRequest, RequestTransmitter};
