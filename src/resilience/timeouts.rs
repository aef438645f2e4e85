//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound each attempt (dispatch and full body read) by a deadline
//! - Turn an elapsed deadline into a transport timeout error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the pending future is dropped on expiry
//! - The deadline is fixed and not configurable

use std::future::Future;
use std::time::Duration;

use crate::client::error::TransportError;

/// Deadline applied to every attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Run `fut`, failing with a timeout error once `duration` elapses.
pub async fn with_timeout<T, F>(duration: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::timeout(duration)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::TransportErrorKind;

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_deadline() {
        let result = with_timeout(REQUEST_TIMEOUT, async {
            tokio::time::sleep(Duration::from_secs(9)).await;
            Ok::<_, TransportError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline_is_timeout() {
        let started = tokio::time::Instant::now();
        let result = with_timeout(REQUEST_TIMEOUT, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, TransportError>(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Timeout);
        assert_eq!(err.message, "request timeout after 10000ms");
        let elapsed = started.elapsed();
        assert!(elapsed >= REQUEST_TIMEOUT && elapsed < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<(), _> =
            with_timeout(REQUEST_TIMEOUT, async { Err(TransportError::connect("refused")) }).await;
        assert_eq!(result.unwrap_err().message, "refused");
    }
}
