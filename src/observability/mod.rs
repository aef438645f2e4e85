//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request engine and proxy handlers produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (request/retry counters, latency histogram)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; binaries decide how to render them
//! - Secrets never reach a log line (headers are masked first)
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
