//! Retry classification.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is worth repeating
//! - Enforce the per-call retry budget
//!
//! # Design Decisions
//! - Network errors and timeouts are always retryable
//! - 5xx and 429 are retryable; every other 4xx is the caller's fault
//! - Validation and decode failures are final

use crate::client::error::Failure;

/// Whether `failure` warrants another attempt.
pub fn is_retryable(failure: &Failure) -> bool {
    match failure {
        Failure::Transport(_) => true,
        Failure::HttpStatus(status) if *status >= 500 => true,
        Failure::HttpStatus(status) if (400..500).contains(status) => *status == 429,
        Failure::HttpStatus(_) | Failure::Validation(_) | Failure::Decode(_) => false,
    }
}

/// Whether attempt `attempt` (0-based) may be followed by another one.
pub fn should_retry(failure: &Failure, attempt: u32, max_retries: u32) -> bool {
    attempt < max_retries && is_retryable(failure)
}
