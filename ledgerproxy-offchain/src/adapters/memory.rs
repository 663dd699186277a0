//! In-memory document store.
//!
//! Documents live in a map shared by every clone of the adapter, keyed by the
//! URI payload. Uploads get a random UUID payload.

use crate::adapter::{payload_of, OffChainAdapter};
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation.
#[derive(Debug, Clone)]
pub struct InMemoryAdapter {
    scheme: String,
    documents: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryAdapter {
    /// Creates an empty store answering to `scheme`.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Stores `data` under a chosen payload and returns its URI.
    pub async fn insert(&self, payload: impl Into<String>, data: Value) -> String {
        let payload = payload.into();
        let uri = self.uri(&payload);
        self.documents.write().await.insert(payload, data);
        uri
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn uri(&self, payload: &str) -> String {
        format!("{}://{}", self.scheme, payload)
    }

    fn payload<'a>(&self, uri: &'a str) -> AdapterResult<&'a str> {
        payload_of(uri)
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| AdapterError::InvalidUri(uri.to_string()))
    }
}

impl Default for InMemoryAdapter {
    fn default() -> Self {
        Self::new("json")
    }
}

#[async_trait]
impl OffChainAdapter for InMemoryAdapter {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn download(&self, uri: &str) -> AdapterResult<Option<Value>> {
        let payload = self.payload(uri)?;
        debug!("Reading in-memory document {}", payload);
        Ok(self.documents.read().await.get(payload).cloned())
    }

    async fn upload(&self, data: &Value) -> AdapterResult<String> {
        let payload = Uuid::new_v4().to_string();
        Ok(self.insert(payload, data.clone()).await)
    }

    async fn update(&self, uri: &str, data: &Value) -> AdapterResult<String> {
        let payload = self.payload(uri)?;
        let mut documents = self.documents.write().await;
        match documents.get_mut(payload) {
            Some(existing) => {
                *existing = data.clone();
                Ok(uri.to_string())
            }
            None => Err(AdapterError::NotFound(uri.to_string())),
        }
    }
}
