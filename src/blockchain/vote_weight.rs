//! Vote weight codec.
//!
//! Callers speak percent in `[-100, 100]`; the network stores basis
//! points in `[-10000, 10000]` as a signed 16-bit integer.

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Largest vote magnitude in percent.
pub const MAX_PERCENT: f64 = 100.0;

/// Largest vote magnitude on the wire.
pub const MAX_NETWORK_WEIGHT: i16 = 10_000;

const SCALE: f64 = 100.0;

/// Convert a percentage into the network's fixed-point weight.
pub fn to_network(percent: f64) -> BlockchainResult<i16> {
    if !percent.is_finite() || percent.abs() > MAX_PERCENT {
        return Err(BlockchainError::InvalidWeight(percent));
    }
    Ok((percent * SCALE).round() as i16)
}

/// Convert a network weight back into a percentage.
pub fn from_network(weight: i16) -> f64 {
    f64::from(weight) / SCALE
}

/// Percentage for an upvote: must not be negative, capped at 100.
pub fn upvote_percent(weight: f64) -> BlockchainResult<f64> {
    if weight.is_nan() || weight < 0.0 {
        return Err(BlockchainError::InvalidWeight(weight));
    }
    Ok(weight.min(MAX_PERCENT))
}

/// Percentage for a downvote: must not be positive, magnitude capped at 100.
pub fn downvote_percent(weight: f64) -> BlockchainResult<f64> {
    if weight.is_nan() || weight > 0.0 {
        return Err(BlockchainError::InvalidWeight(weight));
    }
    Ok(-weight.abs().min(MAX_PERCENT))
}
