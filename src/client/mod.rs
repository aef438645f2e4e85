//! SideShift API client.
//!
//! # Data Flow
//! ```text
//! api.rs (endpoint method: validate args, build URL/body)
//!     → headers.rs (header set for the endpoint)
//!     → engine.rs (attempt loop)
//!         → transport.rs (one HTTP exchange, under resilience::timeouts)
//!         → response.rs (success, or RequestError with payload)
//!         → resilience::retries / resilience::backoff on failure
//!     → JSON value, binary payload or error back to the caller
//! ```
//!
//! # Design Decisions
//! - Headers are derived per call from the immutable config
//! - Failures are typed at their origin ([`Failure`]) instead of inspected later
//! - The transport is a trait so tests can script attempts

pub mod api;
pub mod engine;
pub mod error;
pub mod headers;
pub mod response;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::SideshiftClient;
pub use engine::RequestEngine;
pub use error::{Failure, RequestError, TransportError, TransportErrorKind};
pub use headers::HeaderSet;
pub use transport::{BinaryPayload, RequestOptions, ReqwestTransport, Transport, TransportResponse};
pub use types::{
    CheckoutRequest, FixedShiftRequest, QuoteRequest, RefundAddressRequest, VariableShiftRequest,
};
