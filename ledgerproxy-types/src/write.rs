use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transaction options handed to every remote setter during a flush.
///
/// The core never inspects these; they are forwarded verbatim so the ledger
/// client can sign and broadcast the write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteContext {
    /// Account the write is sent from.
    pub sender: String,
    /// Upper bound on fees, if the caller wants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Client-specific options.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl WriteContext {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Identifier of a completed remote write (usually a transaction hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub id: String,
    /// Whatever else the remote store reported about the write.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl WriteReceipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Value::Null,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}
