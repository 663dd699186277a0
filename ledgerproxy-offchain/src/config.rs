//! Off-chain storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Adapters to register at process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffChainConfig {
    #[serde(default)]
    pub adapters: Vec<AdapterConfig>,
}

impl OffChainConfig {
    /// A single in-memory adapter on the `json` scheme.
    pub fn in_memory() -> Self {
        Self {
            adapters: vec![AdapterConfig::InMemory {
                scheme: default_memory_scheme(),
            }],
        }
    }
}

/// One adapter entry, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdapterConfig {
    /// Process-local documents, useful for tests and previews.
    InMemory {
        #[serde(default = "default_memory_scheme")]
        scheme: String,
    },
    /// Documents stored as JSON files under a directory.
    File(FileAdapterConfig),
    /// Read-only documents served over `http://` and `https://`.
    Http(HttpAdapterConfig),
}

fn default_memory_scheme() -> String {
    "json".to_string()
}

/// File adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAdapterConfig {
    /// Directory holding the documents.
    pub root: PathBuf,
    /// Scheme the adapter answers to.
    #[serde(default = "default_file_scheme")]
    pub scheme: String,
}

fn default_file_scheme() -> String {
    "file".to_string()
}

impl FileAdapterConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scheme: default_file_scheme(),
        }
    }
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpAdapterConfig {
    /// Request timeout (in seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("ledgerproxy/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpAdapterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
