//! Exponential backoff with jitter between roster passes.

use std::time::Duration;

use rand::Rng;

use crate::config::BackoffConfig;

/// Calculate exponential backoff delay with jitter.
///
/// `pass` counts completed passes over the roster; pass 0 never waits.
pub fn calculate_backoff(pass: u32, base_ms: u64, max_ms: u64) -> Duration {
    if pass == 0 || base_ms == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u64.saturating_pow(pass - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    // Jitter: 0 to 10% of the delay
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Backoff for `pass` using configured bounds.
pub fn backoff_for(config: &BackoffConfig, pass: u32) -> Duration {
    calculate_backoff(pass, config.base_delay_ms, config.max_delay_ms)
}
