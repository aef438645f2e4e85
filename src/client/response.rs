//! Response normalization.
//!
//! # Responsibilities
//! - Pass successful responses through untouched (decoding happens later)
//! - Turn non-success responses into a [`RequestError`] with the best error
//!   payload that can be recovered from the body
//! - Emit request diagnostics when verbose mode is on

use serde_json::{json, Value};
use tracing::info;

use crate::client::error::{Failure, RequestError};
use crate::client::headers::filter_headers;
use crate::client::transport::{RequestOptions, TransportResponse};

/// Message of the payload used when an error body is neither JSON nor text.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse error details";

/// Check one response. Diagnostics are logged before the status is looked at,
/// so they appear for failed attempts too.
pub fn normalize(
    response: TransportResponse,
    url: &str,
    options: &RequestOptions,
    verbose: bool,
) -> Result<TransportResponse, RequestError> {
    if verbose {
        log_diagnostics(url, options);
    }

    if response.is_success() {
        return Ok(response);
    }

    let decoded = decode_error_body(&response.body);
    let payload = match decoded {
        Value::Object(mut map) => match map.remove("error") {
            Some(inner) if is_truthy(&inner) => inner,
            Some(inner) => {
                map.insert("error".to_string(), inner);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };

    let message = format!("HTTP {} {}", response.status, response.status_text);
    Err(RequestError::new(
        message.trim_end(),
        Failure::HttpStatus(response.status),
        url,
        options.clone(),
    )
    .with_status(response.status, response.status_text)
    .with_payload(payload))
}

/// JSON first, then UTF-8 text, then a fixed marker object.
pub fn decode_error_body(body: &[u8]) -> Value {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return value;
    }
    match std::str::from_utf8(body) {
        Ok(text) => Value::String(text.to_string()),
        Err(_) => json!({ "message": PARSE_FAILURE_MESSAGE }),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn log_diagnostics(url: &str, options: &RequestOptions) {
    let headers = (!options.headers.is_empty()).then_some(&options.headers);
    info!(
        url = %url,
        method = %options.method,
        headers = %filter_headers(headers),
        body = %render_body(options.body.as_deref()),
        "request diagnostics"
    );
}

/// Pretty-print structured bodies, show anything else verbatim.
fn render_body(body: Option<&str>) -> String {
    match body {
        None => "No body".to_string(),
        Some(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|v| v.is_object() || v.is_array())
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| raw.to_string()),
    }
}
