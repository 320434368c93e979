//! Common test utilities for authnet integration tests

#![allow(dead_code)]

use authnet_lib::{GatewayError, HttpResponse, Result, Transport, TransportRequest};
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

pub const TEST_LOGIN: &str = "5KP3u95bQpv";
pub const TEST_KEY: &str = "346HZ32z3fP4hTG2";

pub const AIM_APPROVED: &str =
    "1|1|1|This transaction has been approved.|QWE123|Y|2149186848|INV-1|Widget|5.00|CC|auth_capture";

pub const XML_FOUND: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<getTransactionDetailsResponse xmlns=\"AnetApi/xml/v1/schema/AnetApiSchema.xsd\">\
<messages><resultCode>Ok</resultCode><message><code>I00001</code><text>Successful.</text></message></messages>\
<transaction><transId>2149186848</transId><transactionStatus>capturedPendingSettlement</transactionStatus>\
<responseCode>1</responseCode><authAmount>5.00</authAmount></transaction>\
</getTransactionDetailsResponse>";

/// What a [`StubTransport`] answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Body(String),
    ConnectionRefused,
}

/// Transport double that records every request and replies with a canned outcome.
pub struct StubTransport {
    reply: StubReply,
    seen: RefCell<Vec<TransportRequest>>,
}

impl StubTransport {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            reply: StubReply::Body(body.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        Self {
            reply: StubReply::ConnectionRefused,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.seen.borrow().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.seen
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &TransportRequest) -> Result<HttpResponse> {
        self.seen.borrow_mut().push(request.clone());
        match &self.reply {
            StubReply::Body(body) => Ok(HttpResponse {
                status_code: 200,
                body: body.clone().into_bytes(),
                ..Default::default()
            }),
            // CURLE_COULDNT_CONNECT
            StubReply::ConnectionRefused => Err(GatewayError::Transport(curl::Error::new(7))),
        }
    }
}

/// Count non-overlapping occurrences of `needle`
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Plain-HTTP gateway on localhost that answers one request.
///
/// The join handle yields the raw request (headers and body) it received.
pub fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub gateway");
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("Failed to accept connection");
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            head.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        format!("{head}{}", String::from_utf8_lossy(&request_body))
    });

    (base, handle)
}

/// URL on localhost where nothing is listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/gateway/transact.dll")
}
