//! Content subsystem.
//!
//! # Data Flow
//! ```text
//! "@author/permlink"
//!     → authorperm.rs (parse identity)
//!     → comment.rs (fetch via RpcClient "get content")
//!         → record.rs (sentinel check, field access)
//!         → metadata.rs, vote.rs (decoded views)
//!     → mutations build operations for blockchain::TransactionBuilder
//! ```

pub mod authorperm;
pub mod comment;
pub mod metadata;
pub mod permlink;
pub mod record;
pub mod types;
pub mod vote;

pub use authorperm::Authorperm;
pub use comment::{Comment, ReplyOptions};
pub use metadata::Metadata;
pub use types::{ContentError, ContentResult};
pub use vote::Vote;
