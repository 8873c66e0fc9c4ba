//! Submission of scanned barcodes to the registration service.

use std::time::Duration;

use serde_json::Value;

use crate::types::CanonicalBarcode;

pub const REGISTER_PATH: &str = "/CodigoBarras/CadastrarScannerBarCode";

/// Raw HTTP reply, before any interpretation of status or body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("could not serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Carries one JSON POST to the remote service.
pub trait Transport {
    fn post_json(&self, path: &str, body: Vec<u8>) -> Result<Reply, TransportError>;
}

pub struct HttpTransport {
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        // `None` clears reqwest's built-in 30s limit: requests wait indefinitely.
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, path: &str, body: Vec<u8>) -> Result<Reply, TransportError> {
        let resp = self
            .client
            .post(self.url_for(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Reply { status, body })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted(Value),
    Rejected,
    TransportFailure,
}

pub struct SubmissionClient<T> {
    transport: T,
}

impl<T: Transport> SubmissionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Posts `record` once. Every failure is folded into the outcome; nothing
    /// propagates to the caller.
    pub fn submit(&self, record: &CanonicalBarcode) -> SubmissionOutcome {
        let body = match serde_json::to_vec(record) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %TransportError::from(e), "could not register barcode");
                return SubmissionOutcome::TransportFailure;
            }
        };

        tracing::info!(
            symbology = %record.symbology,
            code = %record.code,
            "submitting barcode"
        );
        let reply = match self.transport.post_json(REGISTER_PATH, body) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "could not register barcode");
                return SubmissionOutcome::TransportFailure;
            }
        };

        if !(200..300).contains(&reply.status) {
            tracing::warn!(status = reply.status, "barcode registration refused");
            return SubmissionOutcome::Rejected;
        }
        match truthy_payload(&reply.body) {
            Some(payload) => {
                tracing::info!(status = reply.status, "barcode registered");
                SubmissionOutcome::Accepted(payload)
            }
            None => {
                tracing::warn!(
                    status = reply.status,
                    body = %reply.body,
                    "barcode registration returned an empty result"
                );
                SubmissionOutcome::Rejected
            }
        }
    }
}

/// Interprets a success body. Empty bodies, `null`, `false`, `0` and `""` carry
/// no result; other JSON is returned as-is and non-JSON text as a string.
pub fn truthy_payload(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(_) => return Some(Value::String(body.to_string())),
    };
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if falsy { None } else { Some(value) }
}
