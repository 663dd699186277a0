//! File-system document store.
//!
//! Each document is a JSON file directly under the configured root; the URI
//! payload is the file name (`file://<name>.json`).

use crate::adapter::{payload_of, OffChainAdapter};
use crate::config::FileAdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// File storage implementation.
#[derive(Debug, Clone)]
pub struct FileAdapter {
    config: FileAdapterConfig,
}

impl FileAdapter {
    /// Creates a file adapter. The root directory is created on first upload.
    pub fn new(config: FileAdapterConfig) -> Self {
        Self { config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Resolves a URI to a path under the root, rejecting anything that
    /// would escape it.
    fn path_for(&self, uri: &str) -> AdapterResult<PathBuf> {
        let name = payload_of(uri)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AdapterError::InvalidUri(uri.to_string()))?;

        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !plain || name.starts_with('.') {
            return Err(AdapterError::InvalidUri(uri.to_string()));
        }

        Ok(self.config.root.join(name))
    }

    async fn write(&self, path: &Path, data: &Value) -> AdapterResult<()> {
        if !self.config.root.exists() {
            fs::create_dir_all(&self.config.root)
                .await
                .map_err(|e| AdapterError::Storage(format!("failed to create root: {e}")))?;
            info!("Created document root: {:?}", self.config.root);
        }

        let content = serde_json::to_vec_pretty(data)?;
        debug!("Writing document: {:?} ({} bytes)", path, content.len());
        fs::write(path, content)
            .await
            .map_err(|e| AdapterError::Storage(format!("failed to write file: {e}")))
    }
}

#[async_trait]
impl OffChainAdapter for FileAdapter {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn download(&self, uri: &str) -> AdapterResult<Option<Value>> {
        let path = self.path_for(uri)?;
        debug!("Reading document: {:?}", path);

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AdapterError::Storage(format!("failed to read file: {e}"))),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&content)?))
    }

    async fn upload(&self, data: &Value) -> AdapterResult<String> {
        let name = format!("{}.json", Uuid::new_v4());
        let uri = format!("{}://{}", self.config.scheme, name);
        self.write(&self.config.root.join(&name), data).await?;
        info!("Uploaded document {}", uri);
        Ok(uri)
    }

    async fn update(&self, uri: &str, data: &Value) -> AdapterResult<String> {
        let path = self.path_for(uri)?;
        if !path.exists() {
            return Err(AdapterError::NotFound(uri.to_string()));
        }
        self.write(&path, data).await?;
        Ok(uri.to_string())
    }
}
