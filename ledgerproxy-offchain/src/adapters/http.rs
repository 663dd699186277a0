//! Read-only HTTP document host.

use crate::adapter::OffChainAdapter;
use crate::config::HttpAdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Downloads documents with plain `GET` requests.
#[derive(Debug, Clone)]
pub struct HttpAdapter {
    client: Client,
}

impl HttpAdapter {
    /// Creates an HTTP adapter.
    pub fn new(config: &HttpAdapterConfig) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AdapterError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl OffChainAdapter for HttpAdapter {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn download(&self, uri: &str) -> AdapterResult<Option<Value>> {
        debug!("Downloading document: {}", uri);

        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| AdapterError::Network(format!("download failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(AdapterError::Network(format!("download failed ({status}): {error}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Network(format!("read download body failed: {e}")))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn upload(&self, _data: &Value) -> AdapterResult<String> {
        Err(AdapterError::ReadOnly("http"))
    }

    async fn update(&self, _uri: &str, _data: &Value) -> AdapterResult<String> {
        Err(AdapterError::ReadOnly("http"))
    }
}
