//! Shared test helpers for off-chain tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ledgerproxy_offchain::{
    AdapterError, AdapterRegistry, AdapterResult, InMemoryAdapter, OffChainAdapter,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory adapter that counts downloads per URI and can be told to fail.
#[derive(Clone, Default)]
pub struct CountingAdapter {
    pub store: InMemoryAdapter,
    downloads: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<AtomicBool>,
}

impl CountingAdapter {
    pub fn downloads(&self, uri: &str) -> usize {
        self.downloads.lock().unwrap().get(uri).copied().unwrap_or(0)
    }

    pub fn total_downloads(&self) -> usize {
        self.downloads.lock().unwrap().values().sum()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl OffChainAdapter for CountingAdapter {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn download(&self, uri: &str) -> AdapterResult<Option<Value>> {
        *self.downloads.lock().unwrap().entry(uri.to_string()).or_default() += 1;
        tokio::task::yield_now().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdapterError::Network("host unreachable".into()));
        }
        self.store.download(uri).await
    }

    async fn upload(&self, data: &Value) -> AdapterResult<String> {
        self.store.upload(data).await
    }

    async fn update(&self, uri: &str, data: &Value) -> AdapterResult<String> {
        self.store.update(uri, data).await
    }
}

/// A registry with a counting adapter on the `json` scheme.
pub async fn json_registry() -> (Arc<AdapterRegistry>, CountingAdapter) {
    let adapter = CountingAdapter::default();
    let registry = Arc::new(AdapterRegistry::new());
    registry.register("json", Arc::new(adapter.clone())).await;
    (registry, adapter)
}
