//! Error types for the dataset layer.

use ledgerproxy_types::{DatasetId, RemoteError};
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors that can occur in dataset operations.
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    /// The backing remote object was destroyed; the dataset refuses all access.
    #[error("dataset {dataset} is obsolete: {operation} refused")]
    ObsoleteAccess {
        dataset: DatasetId,
        operation: &'static str,
    },

    /// No field with this name was bound.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Remote writes need a deployed remote object.
    #[error("dataset {0} is not deployed")]
    NotDeployed(DatasetId),

    /// A remote getter failed; nothing from this sync round was applied.
    #[error("remote sync failed for field `{field}`: {source}")]
    RemoteSync {
        field: String,
        #[source]
        source: RemoteError,
    },

    /// A remote setter failed. Writes that completed in the same flush stay applied.
    #[error("remote write failed for fields {fields:?}: {source}")]
    WriteFailure {
        fields: Vec<String>,
        #[source]
        source: RemoteError,
    },
}
