//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Share of the base delay used as the jitter range.
const JITTER_RATIO: f64 = 0.2;

/// Largest draw accepted; keeps jitter strictly below `base × 0.2`.
const MAX_DRAW: f64 = 1.0 - f64::EPSILON;

/// Delay before the retry that follows attempt `attempt` (0-based).
pub fn calculate_backoff(attempt: u32, config: &RetryConfig) -> Duration {
    backoff_with_jitter(attempt, config, rand::thread_rng().gen::<f64>())
}

/// Deterministic form of [`calculate_backoff`]; `jitter_fraction` is the
/// random draw in `[0, 1)`. Draws outside that range are clamped into it.
///
/// Once the attempt index reaches the retry budget the cap is returned as is.
/// Otherwise the exponential delay is clamped to the cap and jitter of up to
/// 20% of the base delay is added on top.
pub fn backoff_with_jitter(attempt: u32, config: &RetryConfig, jitter_fraction: f64) -> Duration {
    if attempt >= config.max_retries {
        return Duration::from_millis(config.cap_delay_ms);
    }

    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let exponential = config.backoff_multiplier.powi(exponent) * config.base_delay_ms as f64;
    let capped = exponential.min(config.cap_delay_ms as f64).floor();

    let fraction = if jitter_fraction.is_finite() {
        jitter_fraction.clamp(0.0, MAX_DRAW)
    } else {
        0.0
    };
    let jitter = (fraction * config.base_delay_ms as f64 * JITTER_RATIO).floor();

    Duration::from_millis((capped + jitter) as u64)
}
