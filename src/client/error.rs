//! Failure taxonomy and the normalized request error.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::client::transport::RequestOptions;

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established.
    Connect,
    /// The per-attempt deadline elapsed and the call was aborted.
    Timeout,
    /// The connection broke while reading the response body.
    Body,
    /// Any other failure while sending the request.
    Request,
}

/// Network-level failure of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("request timeout after {}ms", after.as_millis()),
        )
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Body, message)
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Request, message)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = format!("fetch failed: {err}");
        if err.is_timeout() {
            Self::new(TransportErrorKind::Timeout, message)
        } else if err.is_connect() {
            Self::connect(message)
        } else if err.is_body() || err.is_decode() {
            Self::body(message)
        } else {
            Self::request(message)
        }
    }
}

/// Closed set of failure origins, produced where the failure happens.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Network error, aborted or timed-out attempt.
    Transport(TransportError),
    /// The service answered with a non-success status.
    HttpStatus(u16),
    /// The call was rejected before anything was sent.
    Validation(String),
    /// A response body could not be decoded.
    Decode(String),
}

/// Uniform error surfaced for every failed request, whatever its origin.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RequestError {
    /// Human-readable summary.
    pub message: String,
    /// HTTP status, absent for network-level failures.
    pub status: Option<u16>,
    /// Reason phrase matching `status`.
    pub status_text: Option<String>,
    /// Target URL of the request.
    pub url: String,
    /// Method, headers and body that were sent.
    pub options: RequestOptions,
    /// Best-effort error details: parsed JSON, raw text or a fallback object.
    pub payload: Value,
    /// Where the failure originated.
    pub failure: Failure,
    /// Number of transport attempts made before giving up.
    pub attempts: u32,
}

impl RequestError {
    pub fn new(
        message: impl Into<String>,
        failure: Failure,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            status_text: None,
            url: url.into(),
            options,
            payload: Value::Null,
            failure,
            attempts: 0,
        }
    }

    pub fn with_status(mut self, status: u16, status_text: impl Into<String>) -> Self {
        self.status = Some(status);
        self.status_text = Some(status_text.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Failure raised by the transport for one attempt.
    pub fn transport(err: TransportError, url: &str, options: &RequestOptions) -> Self {
        let payload = serde_json::json!({ "message": err.message });
        Self::new(err.message.clone(), Failure::Transport(err), url, options.clone())
            .with_payload(payload)
    }

    /// Rejected before dispatch because the target URL is missing.
    pub fn invalid_url(url: &str, options: &RequestOptions) -> Self {
        Self::new(
            "Invalid URL provided",
            Failure::Validation("Invalid URL provided".to_string()),
            url,
            options.clone(),
        )
    }

    /// Final error handed to the caller once retries are exhausted or the
    /// failure is not retryable. Status and payload of `inner` are kept.
    pub fn terminal(prefix: &str, inner: RequestError, attempts: u32) -> Self {
        let detail = inner
            .payload_message()
            .unwrap_or(inner.message.as_str())
            .to_string();
        Self {
            message: format!("{prefix}: {detail}"),
            attempts,
            ..inner
        }
    }

    /// String `message` field of an object payload. Text payloads stay in
    /// `payload` and never replace the status line.
    pub fn payload_message(&self) -> Option<&str> {
        match &self.payload {
            Value::Object(map) => map.get("message").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.failure, Failure::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::headers::base_headers;
    use serde_json::json;

    fn options() -> RequestOptions {
        RequestOptions::get(base_headers())
    }

    #[test]
    fn test_terminal_prefers_payload_message() {
        let inner = RequestError::new(
            "HTTP 400 Bad Request",
            Failure::HttpStatus(400),
            "https://example.com/quotes",
            options(),
        )
        .with_status(400, "Bad Request")
        .with_payload(json!({ "message": "Invalid settleAddress" }));

        let err = RequestError::terminal("Fetch API error", inner, 1);
        assert_eq!(err.message, "Fetch API error: Invalid settleAddress");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.status_text.as_deref(), Some("Bad Request"));
        assert_eq!(err.attempts, 1);
        assert_eq!(err.failure, Failure::HttpStatus(400));
    }

    #[test]
    fn test_terminal_falls_back_to_message() {
        let inner = RequestError::new(
            "HTTP 502 Bad Gateway",
            Failure::HttpStatus(502),
            "https://example.com/coins",
            options(),
        )
        .with_payload(json!({ "code": 17 }));

        let err = RequestError::terminal("Fetch API error", inner, 3);
        assert_eq!(err.message, "Fetch API error: HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_terminal_ignores_text_payload() {
        let inner = RequestError::new(
            "HTTP 500 Internal Server Error",
            Failure::HttpStatus(500),
            "https://example.com/coins",
            options(),
        )
        .with_status(500, "Internal Server Error")
        .with_payload(json!("Server error occurred"));

        assert_eq!(inner.payload_message(), None);
        let err = RequestError::terminal("Fetch API error", inner, 1);
        assert_eq!(err.message, "Fetch API error: HTTP 500 Internal Server Error");
        assert_eq!(err.payload, json!("Server error occurred"));
    }

    #[test]
    fn test_transport_error_carries_no_status() {
        let err = RequestError::transport(
            TransportError::connect("fetch failed: connection refused"),
            "https://example.com/coins",
            &options(),
        );
        assert_eq!(err.status, None);
        assert_eq!(err.payload_message(), Some("fetch failed: connection refused"));
        assert!(matches!(err.failure, Failure::Transport(_)));
    }

    #[test]
    fn test_timeout_message() {
        let err = TransportError::timeout(Duration::from_secs(10));
        assert_eq!(err.kind, TransportErrorKind::Timeout);
        assert_eq!(err.to_string(), "request timeout after 10000ms");
    }
}
