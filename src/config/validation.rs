//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the roster is non-empty and every URL parses
//! - Validate value ranges (timeouts > 0, retries > 0, backoff bounds)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoNodes,
    InvalidNodeUrl { url: String, reason: String },
    ZeroTimeout,
    ZeroRetries,
    BackoffBounds { base_ms: u64, max_ms: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoNodes => write!(f, "at least one node must be configured"),
            ValidationError::InvalidNodeUrl { url, reason } => {
                write!(f, "invalid node url '{}': {}", url, reason)
            }
            ValidationError::ZeroTimeout => write!(f, "timeout_secs must be greater than 0"),
            ValidationError::ZeroRetries => write!(f, "num_retries must be greater than 0"),
            ValidationError::BackoffBounds { base_ms, max_ms } => write!(
                f,
                "backoff base_delay_ms ({}) exceeds max_delay_ms ({})",
                base_ms, max_ms
            ),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nodes.is_empty() {
        errors.push(ValidationError::NoNodes);
    }

    for node in &config.nodes {
        if let Err(e) = url::Url::parse(&node.url) {
            errors.push(ValidationError::InvalidNodeUrl {
                url: node.url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.num_retries == 0 {
        errors.push(ValidationError::ZeroRetries);
    }

    if config.backoff.base_delay_ms > config.backoff.max_delay_ms {
        errors.push(ValidationError::BackoffBounds {
            base_ms: config.backoff.base_delay_ms,
            max_ms: config.backoff.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
