//! Error types for off-chain storage.

use thiserror::Error;

/// Result type for adapter calls.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors reported by an off-chain storage adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Storage error (file system, backing store).
    #[error("storage error: {0}")]
    Storage(String),

    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The URI payload is not one this adapter can address.
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    /// The adapter cannot write.
    #[error("{0} adapter is read-only")]
    ReadOnly(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage pointer and registry operations.
pub type OffChainResult<T> = Result<T, OffChainError>;

/// Errors that can occur while resolving off-chain documents.
///
/// Nothing is cached when resolution fails, so every variant is recoverable
/// by fixing the referenced document and retrying.
#[derive(Debug, Error)]
pub enum OffChainError {
    /// No adapter registered for the URI scheme.
    #[error("unsupported storage scheme: `{0}`")]
    UnsupportedScheme(String),

    /// The adapter failed to download the document.
    #[error("failed to download {uri}: {source}")]
    Download {
        uri: String,
        #[source]
        source: AdapterError,
    },

    /// The downloaded document is not a JSON object.
    #[error("document at {uri} is not a JSON object")]
    InvalidDocument { uri: String },

    /// A field declared as a pointer does not hold a usable URI.
    #[error("invalid pointer in field `{field}` of {uri}: {reason}")]
    InvalidPointer {
        uri: String,
        field: String,
        reason: String,
    },

    /// The field is not part of the pointer's schema.
    #[error("field `{0}` is not declared")]
    UndeclaredField(String),

    /// The field is declared but is not a pointer.
    #[error("field `{0}` is not a pointer")]
    NotAPointer(String),

    /// Adapter error outside a download (setup, upload, update).
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
