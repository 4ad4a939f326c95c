//! Listing views.
//!
//! # Data Flow
//! ```text
//! RecentReplies / RecentByPath::fetch
//!     → paging.rs (repeated RpcClient calls, cursor = last entry)
//!     → filter (skip own replies / category + top-level)
//!     → Comment::from_record for each kept entry
//!     → owned, indexable sequence; no further network use
//! ```

pub mod by_path;
pub mod paging;
pub mod replies;

pub use by_path::RecentByPath;
pub use replies::RecentReplies;

/// Default number of entries a view materializes.
pub const DEFAULT_LIMIT: usize = 20;
