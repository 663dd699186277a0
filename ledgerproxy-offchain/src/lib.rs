//! Off-chain document resolution for ledgerproxy.
//!
//! Values too large or too mutable for a ledger live in JSON documents hosted
//! elsewhere and are referenced by `<scheme>://<payload>` URIs. This crate
//! provides:
//! - [`OffChainAdapter`]: the download/upload/update contract a document host implements
//! - [`AdapterRegistry`]: scheme → adapter lookup, configured once per process
//! - [`StoragePointer`]: a lazily downloaded document whose fields may point
//!   at further documents
//! - Built-in adapters for in-memory, file-system and HTTP hosts
//!
//! # Example
//!
//! ```
//! use ledgerproxy_offchain::{AdapterRegistry, FieldDef, InMemoryAdapter, StoragePointer};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = InMemoryAdapter::new("json");
//! let registry = Arc::new(AdapterRegistry::new());
//! registry.register("json", Arc::new(store.clone())).await;
//!
//! let desc = store.insert("desc", json!({"body": "Sea view"})).await;
//! let root = store.insert("hotel", json!({"name": "Inn", "desc": desc})).await;
//!
//! let pointer = StoragePointer::new(
//!     root,
//!     [FieldDef::value("name"), FieldDef::pointer("desc", [FieldDef::value("body")])],
//!     registry,
//! );
//! let desc = pointer.get_pointer("desc").await.unwrap();
//! assert_eq!(desc.get_value("body").await.unwrap(), Some(json!("Sea view")));
//! # });
//! ```

pub mod adapter;
pub mod adapters;
pub mod config;
mod error;
pub mod pointer;
pub mod registry;

pub use adapter::{payload_of, scheme_of, OffChainAdapter};
pub use adapters::{FileAdapter, HttpAdapter, InMemoryAdapter};
pub use config::{AdapterConfig, FileAdapterConfig, HttpAdapterConfig, OffChainConfig};
pub use error::{AdapterError, AdapterResult, OffChainError, OffChainResult};
pub use pointer::{DocumentField, FieldDef, StoragePointer};
pub use registry::AdapterRegistry;
