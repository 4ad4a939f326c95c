//! Ledger mutation subsystem.
//!
//! # Data Flow
//! ```text
//! Comment mutation (vote, reply, edit, delete, resteem)
//!     → vote_weight.rs (percent → network basis points)
//!     → operation.rs (typed operation + required authority)
//!     → transaction.rs (TaPoS reference, expiration)
//!     → signer.rs (external signer attaches signatures)
//!     → rpc client broadcast, or returned as-is in dry-run mode
//! ```
//!
//! # Security Constraints
//! - No private keys are stored or read here
//! - Rejected broadcasts are surfaced, never retried

pub mod operation;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod vote_weight;

pub use operation::{
    AuthorityLevel, CommentOperation, CustomJsonOperation, DeleteCommentOperation, Operation,
    RequiredAuthority, VoteOperation,
};
pub use signer::{Signer, SignerError};
pub use transaction::{TaposRef, Transaction, TransactionBuilder};
pub use types::{BlockchainError, BlockchainResult};
