//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Logical RPC call:
//!     → retries.rs (claim an attempt from the per-call budget)
//!     → per-attempt timeout (tokio::time::timeout in rpc::client)
//!     → On node failure: rotate roster, backoff.rs after each full pass
//! ```
//!
//! # Design Decisions
//! - Timeouts apply per node attempt, never to the whole call
//! - Mutating broadcasts rejected by the network are never retried

pub mod backoff;
pub mod retries;
