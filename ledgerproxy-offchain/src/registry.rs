//! Adapter registry keyed by URI scheme.
//!
//! One registry is configured at process start and shared by reference with
//! every storage pointer. `reset` exists so tests can start from a clean slate.

use crate::adapter::{scheme_of, OffChainAdapter};
use crate::adapters::{FileAdapter, HttpAdapter, InMemoryAdapter};
use crate::config::{AdapterConfig, OffChainConfig};
use crate::error::{OffChainError, OffChainResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Maps URI schemes to the adapters that serve them.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<String, Arc<dyn OffChainAdapter>>>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry populated from `config`.
    pub async fn from_config(config: &OffChainConfig) -> OffChainResult<Self> {
        let registry = Self::new();
        registry.setup(config).await?;
        Ok(registry)
    }

    /// Replaces every registered adapter with the ones described by `config`.
    pub async fn setup(&self, config: &OffChainConfig) -> OffChainResult<()> {
        let mut adapters: HashMap<String, Arc<dyn OffChainAdapter>> = HashMap::new();

        for entry in &config.adapters {
            match entry {
                AdapterConfig::InMemory { scheme } => {
                    adapters.insert(scheme.clone(), Arc::new(InMemoryAdapter::new(scheme.clone())));
                }
                AdapterConfig::File(file) => {
                    adapters.insert(file.scheme.clone(), Arc::new(FileAdapter::new(file.clone())));
                }
                AdapterConfig::Http(http) => {
                    let adapter: Arc<dyn OffChainAdapter> = Arc::new(HttpAdapter::new(http)?);
                    adapters.insert("http".to_string(), adapter.clone());
                    adapters.insert("https".to_string(), adapter);
                }
            }
        }

        info!("Off-chain adapters configured for schemes: {:?}", sorted_keys(&adapters));
        *self.adapters.write().await = adapters;
        Ok(())
    }

    /// Registers `adapter` for `scheme`, replacing any previous one.
    pub async fn register(&self, scheme: impl Into<String>, adapter: Arc<dyn OffChainAdapter>) {
        let scheme = scheme.into();
        debug!("Registering {} adapter for `{}`", adapter.name(), scheme);
        self.adapters.write().await.insert(scheme, adapter);
    }

    /// Returns the adapter registered for `scheme`.
    pub async fn adapter(&self, scheme: &str) -> OffChainResult<Arc<dyn OffChainAdapter>> {
        self.adapters
            .read()
            .await
            .get(scheme)
            .cloned()
            .ok_or_else(|| OffChainError::UnsupportedScheme(scheme.to_string()))
    }

    /// Returns the adapter serving `uri`.
    pub async fn adapter_for(&self, uri: &str) -> OffChainResult<Arc<dyn OffChainAdapter>> {
        let scheme = scheme_of(uri).ok_or_else(|| OffChainError::UnsupportedScheme(String::new()))?;
        self.adapter(scheme).await
    }

    /// Uploads a new document through the adapter registered for `scheme`.
    pub async fn upload(&self, scheme: &str, data: &Value) -> OffChainResult<String> {
        let adapter = self.adapter(scheme).await?;
        Ok(adapter.upload(data).await?)
    }

    /// Replaces the document at `uri`.
    pub async fn update(&self, uri: &str, data: &Value) -> OffChainResult<String> {
        let adapter = self.adapter_for(uri).await?;
        Ok(adapter.update(uri, data).await?)
    }

    /// Registered schemes, sorted.
    pub async fn schemes(&self) -> Vec<String> {
        sorted_keys(&*self.adapters.read().await)
    }

    /// Drops every registered adapter.
    pub async fn reset(&self) {
        self.adapters.write().await.clear();
        debug!("Off-chain adapter registry reset");
    }
}

fn sorted_keys(adapters: &HashMap<String, Arc<dyn OffChainAdapter>>) -> Vec<String> {
    let mut schemes: Vec<String> = adapters.keys().cloned().collect();
    schemes.sort();
    schemes
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry").finish_non_exhaustive()
    }
}
