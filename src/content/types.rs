//! Error definitions for content access.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::rpc::RpcError;

/// Errors that can occur while reading or mutating content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The addressed content does not exist on the network.
    #[error("content {0} does not exist")]
    ContentNotFound(String),

    /// An identifier was not of the form `@author/permlink`.
    #[error("invalid authorperm '{0}': expected @author/permlink")]
    InvalidAuthorperm(String),

    /// A node returned a record that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

impl ContentError {
    /// True for a vote weight rejected before any network call.
    pub fn is_invalid_weight(&self) -> bool {
        matches!(self, ContentError::Blockchain(BlockchainError::InvalidWeight(_)))
    }
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;
