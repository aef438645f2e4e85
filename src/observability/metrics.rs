//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sideshift_requests_total` (counter): logical calls by method and outcome
//! - `sideshift_retries_total` (counter): retries scheduled by method
//! - `sideshift_request_duration_seconds` (histogram): call latency, retries included

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Install the Prometheus recorder. Later calls return the existing handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Handle for rendering, if the recorder is installed.
pub fn handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

fn register_metrics() {
    describe_counter!(
        "sideshift_requests_total",
        "Logical API calls by HTTP method and outcome"
    );
    describe_counter!(
        "sideshift_retries_total",
        "Retries scheduled after a retryable failure"
    );
    describe_histogram!(
        "sideshift_request_duration_seconds",
        "Wall time of a logical call including backoff"
    );
}

/// Terminal outcome of a logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Record one finished call.
pub fn record_request(method: &str, outcome: Outcome, started: Instant) {
    counter!(
        "sideshift_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!("sideshift_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record one scheduled retry.
pub fn record_retry(method: &str) {
    counter!("sideshift_retries_total", "method" => method.to_string()).increment(1);
}
