//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Largest jitter ratio accepted; anything above is clamped.
pub const MAX_JITTER_RATIO: f64 = 0.5;

/// Calculate exponential backoff delay with jitter.
///
/// Retry `attempt` (1-based) waits `base_ms * 2^(attempt-1)`, capped at
/// `max_ms`, plus a random jitter in `[0, delay * jitter_ratio]`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let ratio = jitter_ratio.clamp(0.0, MAX_JITTER_RATIO);
    let jitter_range = (capped_delay as f64 * ratio) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..=jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Longest delay [`calculate_backoff`] can return for `attempt`.
pub fn max_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let capped_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt - 1)).min(max_ms);
    let ratio = jitter_ratio.clamp(0.0, MAX_JITTER_RATIO);
    let jitter_range = (capped_delay as f64 * ratio) as u64;

    Duration::from_millis(capped_delay.saturating_add(jitter_range))
}
