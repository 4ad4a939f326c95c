//! Error definitions for transaction assembly and broadcast.

use thiserror::Error;

use crate::blockchain::operation::AuthorityLevel;
use crate::rpc::RpcError;

/// Errors that can occur while building or submitting transactions.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Vote weight outside [-100, 100] percent (or not a number).
    #[error("invalid vote weight {0}: must be within [-100, 100] percent")]
    InvalidWeight(f64),

    /// No operations were appended before building.
    #[error("transaction has no operations")]
    EmptyTransaction,

    /// An operation does not name an acting account.
    #[error("{0} operation names no acting account")]
    NoAuthority(&'static str),

    /// The signer holds no key for a required authority.
    #[error("no {level} key available for account '{account}'")]
    MissingKey { account: String, level: AuthorityLevel },

    /// The external signer failed.
    #[error("signing failed: {0}")]
    Signer(String),

    /// The transaction could not be encoded for submission.
    #[error("transaction encoding failed: {0}")]
    Encode(String),

    /// The network refused the transaction. Never retried.
    #[error("broadcast rejected ({code}): {message}")]
    BroadcastRejected { code: i64, message: String },

    /// Head block data needed for the transaction reference was unusable.
    #[error("invalid global properties: {0}")]
    InvalidGlobalProperties(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
