//! Metrics collection.
//!
//! # Metrics
//! - `steem_rpc_attempts_total` (counter): attempts by logical method, node, outcome
//! - `steem_rpc_failovers_total` (counter): roster rotations by source node
//! - `steem_broadcasts_total` (counter): transactions by outcome
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application
//!   decides whether and where to export them
//! - Labels are node URLs, never account names or payloads

/// Outcome label for a single node attempt.
pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_NODE_ERROR: &str = "node_error";
pub const OUTCOME_REMOTE_ERROR: &str = "remote_error";

/// Record one attempt of a logical call against a node.
pub fn record_rpc_attempt(method: &'static str, node: &str, outcome: &'static str) {
    metrics::counter!(
        "steem_rpc_attempts_total",
        "method" => method,
        "node" => node.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a roster rotation away from `from`.
pub fn record_failover(from: &str) {
    metrics::counter!("steem_rpc_failovers_total", "from" => from.to_string()).increment(1);
}

/// Record a transaction submission (or dry run).
pub fn record_broadcast(outcome: &'static str) {
    metrics::counter!("steem_broadcasts_total", "outcome" => outcome).increment(1);
}
