//! Request engine: the retry loop every endpoint goes through.
//!
//! One logical call runs as a bounded loop of attempts:
//!
//! ```text
//! DISPATCH → AWAIT_RESPONSE ─┬─ ok ──────────────→ decode → SUCCESS
//!     ↑                      └─ failed attempt ──┬─ retryable, budget left → backoff → DISPATCH
//!     │                                          └─ otherwise → FAIL
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! Attempts are strictly sequential. The only suspension points are the
//! transport call (bounded by [`REQUEST_TIMEOUT`]) and the backoff sleep.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::client::error::{Failure, RequestError};
use crate::client::response::normalize;
use crate::client::transport::{BinaryPayload, RequestOptions, Transport, TransportResponse};
use crate::config::ClientConfig;
use crate::observability::metrics::{self, Outcome};
use crate::resilience::{backoff_with_jitter, should_retry, with_timeout, REQUEST_TIMEOUT};

const JSON_ERROR_PREFIX: &str = "Fetch API error";
const IMAGE_ERROR_PREFIX: &str = "Fetch API image error";

fn random_jitter() -> f64 {
    rand::thread_rng().gen::<f64>()
}

/// Runs logical calls against a [`Transport`].
pub struct RequestEngine {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    cancel_order_url: Option<String>,
    jitter: fn() -> f64,
}

impl RequestEngine {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            cancel_order_url: None,
            jitter: random_jitter,
        }
    }

    /// URL whose `204 No Content` answer is turned into a cancellation result.
    pub fn with_cancel_order_url(mut self, url: impl Into<String>) -> Self {
        self.cancel_order_url = Some(url.into());
        self
    }

    /// Replace the jitter source; it must return values in `[0, 1)`.
    pub fn with_jitter(mut self, jitter: fn() -> f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a call whose answer is JSON.
    pub async fn request_json(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, RequestError> {
        let is_cancel = self.cancel_order_url.as_deref() == Some(url);
        self.execute(url, options, JSON_ERROR_PREFIX, |response, url, options| {
            if is_cancel && response.status == 204 {
                return Ok(cancellation_result(options, self.config.verbose));
            }
            serde_json::from_slice::<Value>(&response.body).map_err(|e| {
                RequestError::new(e.to_string(), Failure::Decode(e.to_string()), url, options.clone())
                    .with_status(response.status, response.status_text.clone())
                    .with_payload(json!({ "message": e.to_string() }))
            })
        })
        .await
    }

    /// Perform a call whose answer is raw bytes (coin icons).
    pub async fn request_binary(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<BinaryPayload, RequestError> {
        self.execute(url, options, IMAGE_ERROR_PREFIX, |response, _, _| {
            Ok(BinaryPayload {
                content_type: response.content_type,
                data: response.body,
            })
        })
        .await
    }

    async fn execute<T, F>(
        &self,
        url: &str,
        options: RequestOptions,
        prefix: &'static str,
        decode: F,
    ) -> Result<T, RequestError>
    where
        F: Fn(TransportResponse, &str, &RequestOptions) -> Result<T, RequestError>,
    {
        let started = Instant::now();
        let result = self.run_attempts(url, &options, prefix, decode).await;
        let outcome = if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        metrics::record_request(options.method.as_str(), outcome, started);
        result
    }

    async fn run_attempts<T, F>(
        &self,
        url: &str,
        options: &RequestOptions,
        prefix: &'static str,
        decode: F,
    ) -> Result<T, RequestError>
    where
        F: Fn(TransportResponse, &str, &RequestOptions) -> Result<T, RequestError>,
    {
        if url.trim().is_empty() {
            error!(method = %options.method, "rejected request without URL");
            return Err(RequestError::invalid_url(url, options));
        }
        if let Some(header) = options.headers.invalid_header() {
            let message = format!("invalid value for header {header}");
            error!(url = %url, header, "rejected request with invalid header");
            return Err(RequestError::new(
                message.clone(),
                Failure::Validation(message),
                url,
                options.clone(),
            ));
        }

        let retries = &self.config.retries;
        let mut attempt: u32 = 0;

        loop {
            debug!(url = %url, method = %options.method, attempt, "dispatching request");

            let outcome = match with_timeout(REQUEST_TIMEOUT, self.transport.send(url, options)).await
            {
                Ok(response) => normalize(response, url, options, self.config.verbose)
                    .and_then(|response| decode(response, url, options)),
                Err(err) => Err(RequestError::transport(err, url, options)),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !should_retry(&err.failure, attempt, retries.max_retries) {
                error!(
                    url = %url,
                    method = %options.method,
                    status = ?err.status,
                    attempts = attempt + 1,
                    error = %err.message,
                    "request failed"
                );
                return Err(RequestError::terminal(prefix, err, attempt + 1));
            }

            let delay = backoff_with_jitter(attempt, retries, (self.jitter)());
            if self.config.verbose {
                warn!(
                    url = %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err.message,
                    "request failed, retrying"
                );
            } else {
                debug!(
                    url = %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err.message,
                    "request failed, retrying"
                );
            }
            metrics::record_retry(options.method.as_str());

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Synthetic result for a cancelled order; the id comes from the request
/// body and degrades to `null` when the body cannot be read.
fn cancellation_result(options: &RequestOptions, verbose: bool) -> Value {
    let order_id = match options.body.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(body)) => body.get("orderId").cloned().unwrap_or(Value::Null),
        Some(Err(e)) => {
            if verbose {
                warn!(error = %e, "failed to parse request body");
            }
            Value::Null
        }
        None => Value::Null,
    };
    json!({ "success": true, "orderId": order_id })
}
