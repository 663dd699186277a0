//! Remote-backed datasets for ledgerproxy.
//!
//! A [`RemoteBackedDataset`] presents a set of named fields as ordinary
//! readable/writable values while their authoritative copies live in a remote,
//! latency-heavy, transactional store such as a smart contract.
//!
//! # Field lifecycle
//!
//! Every field starts `Unsynced`. Reading it on a deployed dataset fetches all
//! unsynced fields at once and moves them to `Synced`. Writing a different
//! value moves it to `Dirty`. Flushing pushes dirty fields through their
//! remote setters; fields that share a [`SetterGroup`] cost one remote write.
//!
//! # Example
//!
//! ```
//! use ledgerproxy_dataset::{FieldDef, RemoteBackedDataset, SetterGroup};
//! use ledgerproxy_types::{WriteContext, WriteReceipt};
//! use serde_json::json;
//!
//! # tokio_test_block_on(async {
//! let edit_info = SetterGroup::new("editInfo", |_ctx, values| {
//!     let url = values.get_str("url").map(str::to_string);
//!     async move { Ok(WriteReceipt::new(format!("tx-{}", url.unwrap_or_default()))) }
//! });
//!
//! let dataset = RemoteBackedDataset::bind_deployed([
//!     FieldDef::new("url")
//!         .with_getter(|| async { Ok(Some(json!("https://old.example"))) })
//!         .with_setter(edit_info),
//! ]);
//!
//! assert_eq!(dataset.get("url").await.unwrap(), Some(json!("https://old.example")));
//! dataset.set("url", json!("https://new.example")).await.unwrap();
//! let receipts = dataset.flush_writes(&WriteContext::new("0xowner")).await.unwrap();
//! assert_eq!(receipts.len(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod dataset;
mod error;
mod field;
mod state;

pub use dataset::RemoteBackedDataset;
pub use error::{DatasetError, DatasetResult};
pub use field::{FieldDef, FieldValues, RemoteGetter, RemoteSetter, SetterGroup};
pub use state::{FieldState, Lifecycle};
