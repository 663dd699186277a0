//! Error types for hotel operations.

use ledgerproxy_dataset::DatasetError;
use ledgerproxy_offchain::OffChainError;
use ledgerproxy_types::RemoteError;
use thiserror::Error;

/// Result type for hotel operations.
pub type HotelResult<T> = Result<T, HotelError>;

/// Errors that can occur while reading or provisioning a hotel.
#[derive(Debug, Error)]
pub enum HotelError {
    /// On-ledger field access failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Data index resolution failed.
    #[error(transparent)]
    OffChain(#[from] OffChainError),

    /// A direct contract call failed.
    #[error("contract call failed: {0}")]
    Remote(#[from] RemoteError),

    /// The hotel has no data index url.
    #[error("hotel has no data index url")]
    MissingUrl,

    /// The hotel has not been registered on the ledger.
    #[error("hotel is not deployed")]
    NotDeployed,

    /// The hotel is already registered.
    #[error("hotel is already deployed at {0}")]
    AlreadyDeployed(String),
}
