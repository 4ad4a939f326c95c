//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rpc, blockchain, content produce:
//!     → tracing events (node failures, rotations, broadcasts)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → any `metrics` recorder installed by the application
//! ```

pub mod logging;
pub mod metrics;
