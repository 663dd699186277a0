//! Off-chain storage adapter contract.
//!
//! Defines a common interface for document hosts addressed by
//! `<scheme>://<payload>` URIs. The payload is opaque to everything but the
//! adapter registered for the scheme.

use crate::error::AdapterResult;
use async_trait::async_trait;
use serde_json::Value;

/// Abstract off-chain document store.
#[async_trait]
pub trait OffChainAdapter: Send + Sync {
    /// Returns the name of the storage backend.
    fn name(&self) -> &'static str;

    /// Downloads the document at `uri`. `None` means there is no document.
    async fn download(&self, uri: &str) -> AdapterResult<Option<Value>>;

    /// Stores a new document and returns its URI.
    async fn upload(&self, data: &Value) -> AdapterResult<String>;

    /// Replaces the document at `uri` and returns the URI it now lives at.
    async fn update(&self, uri: &str, data: &Value) -> AdapterResult<String>;
}

/// Returns the scheme of a `scheme://payload` URI.
pub fn scheme_of(uri: &str) -> Option<&str> {
    uri.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty())
}

/// Returns the payload of a `scheme://payload` URI.
pub fn payload_of(uri: &str) -> Option<&str> {
    uri.split_once("://").map(|(_, payload)| payload)
}
