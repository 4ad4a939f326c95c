//! Configuration schema definitions.
//!
//! This module defines the configuration consumed by the RPC client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::rpc::roster::Dialect;

/// Root configuration for the content client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Candidate RPC nodes, tried in order.
    pub nodes: Vec<NodeConfig>,

    /// Maximum number of attempts per logical call, across rotations.
    pub num_retries: u32,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Build and sign transactions without submitting them.
    pub nobroadcast: bool,

    /// Transaction expiration window in seconds.
    pub expiration_secs: u64,

    /// Delay applied between full passes over the roster.
    pub backoff: BackoffConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: vec![NodeConfig {
                url: "https://api.steemit.com".to_string(),
                dialect: Dialect::Appbase,
            }],
            num_retries: 5,
            timeout_secs: 10,
            nobroadcast: false,
            expiration_secs: 60,
            backoff: BackoffConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A single RPC endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodeConfig {
    /// Endpoint URL (e.g., "https://api.steemit.com").
    pub url: String,

    /// API dialect spoken by the node.
    #[serde(default)]
    pub dialect: Dialect,
}

/// Backoff between roster passes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Record RPC counters through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}
