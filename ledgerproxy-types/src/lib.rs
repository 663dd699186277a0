//! Core type definitions for ledgerproxy.
//!
//! This crate defines the vocabulary shared by the dataset engine, the
//! off-chain document resolver and the domain entities built on top of them:
//! - Dataset identifiers (UUID v7)
//! - Write context and write receipts exchanged with remote setters
//! - The error type remote collaborators report failures with
//!
//! Nothing here performs I/O.

mod ids;
mod write;

pub use ids::DatasetId;
pub use write::{WriteContext, WriteReceipt};

/// Values mirrored from remote stores are plain JSON.
pub type Value = serde_json::Value;

/// Result type for calls into a remote collaborator (ledger client, contract).
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Errors reported by remote getters, setters and contract calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The call could not be carried out (transport, node, decoding).
    #[error("remote call failed: {0}")]
    Call(String),

    /// The remote store refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The remote object has no identity yet.
    #[error("remote object is not deployed")]
    NotDeployed,

    /// Timeout.
    #[error("remote call timed out")]
    Timeout,
}
