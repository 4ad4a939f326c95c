//! Node access subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig.nodes
//!     → roster.rs (NodeRoster: endpoints + dialect tags + cursor)
//!     → client.rs (RpcClient::call with retry budget)
//!         → dialect.rs (LogicalMethod × Dialect → method name + params)
//!         → transport.rs (HTTP POST, per-attempt timeout)
//!         → dialect.rs (unwrap envelopes, normalize assets)
//!     → serde_json::Value in one shape for every dialect
//! ```

pub mod client;
pub mod dialect;
pub mod roster;
pub mod transport;
pub mod types;

pub use client::{ClientSettings, RpcClient};
pub use dialect::{DiscussionQuery, DiscussionSort, LogicalMethod};
pub use roster::{Dialect, NodeEndpoint, NodeRoster};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{RpcError, RpcRequest, RpcResponse, RpcResult};
