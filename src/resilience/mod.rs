//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt sent by the request engine:
//!     → timeouts.rs (every attempt runs under REQUEST_TIMEOUT)
//!     → On failure: retries.rs (retryable? budget left?)
//!     → backoff.rs (delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Timed-out attempts are transport failures and therefore retryable
//! - Only 5xx and 429 are retried among HTTP statuses
//! - Jitter is added after the cap, so a delay may slightly exceed it

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::{backoff_with_jitter, calculate_backoff};
pub use retries::{is_retryable, should_retry};
pub use timeouts::{with_timeout, REQUEST_TIMEOUT};
