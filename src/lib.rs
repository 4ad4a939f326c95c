//! Steem content access library.
//!
//! Read posts and comments from a roster of Steem JSON-RPC nodes and build
//! vote, reply, edit, delete and resteem transactions for them.
//!
//! # Architecture Overview
//!
//! ```text
//!   Comment / RecentReplies / RecentByPath        (content, views)
//!        │                      │
//!        │ reads                │ mutations
//!        ▼                      ▼
//!   RpcClient::call ◀──── TransactionBuilder ────▶ Signer (external)
//!        │                                         (blockchain)
//!        ▼
//!   dialect ─▶ roster cursor ─▶ Transport (HTTP)   (rpc)
//!        │
//!        └── retry budget + backoff                (resilience)
//!
//!   config ── observability ── instance            (cross-cutting)
//! ```

pub mod blockchain;
pub mod config;
pub mod content;
pub mod instance;
pub mod observability;
pub mod resilience;
pub mod rpc;
pub mod views;

pub use config::ClientConfig;
pub use content::{Authorperm, Comment, ContentError};
pub use rpc::{Dialect, RpcClient};
pub use views::{RecentByPath, RecentReplies};
