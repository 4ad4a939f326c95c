//! Interface to the external signer.
//!
//! # Security
//! - This crate never holds private keys; the signer owns them
//! - Callers pass a signer explicitly to every mutation

use async_trait::async_trait;
use thiserror::Error;

use crate::blockchain::operation::{AuthorityLevel, RequiredAuthority};
use crate::blockchain::transaction::Transaction;

/// Failure reported by a signer implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SignerError(pub String);

/// Produces signatures for transactions.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Whether a key for `account` at `level` is available.
    fn has_key(&self, account: &str, level: AuthorityLevel) -> bool;

    /// Attach signatures for every authority in `authorities`.
    async fn sign(
        &self,
        transaction: Transaction,
        authorities: &[RequiredAuthority],
    ) -> Result<Transaction, SignerError>;
}
