//! Storage pointers: lazily resolved off-chain documents.
//!
//! A pointer is a URI plus the schema of the document it addresses. Nothing is
//! downloaded until a field is read; the whole document is then fetched once
//! and every field declared as a pointer is turned into a child
//! [`StoragePointer`], which stays unresolved until one of its own fields is
//! read.

use crate::error::{OffChainError, OffChainResult};
use crate::registry::AdapterRegistry;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

/// Declares one top-level field of an off-chain document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// The field holds the URI of another document.
    #[serde(default)]
    pub is_pointer: bool,
    /// Schema of the referenced document. Only meaningful for pointers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
}

impl FieldDef {
    /// Shorthand for a plain value field.
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pointer: false,
            fields: Vec::new(),
        }
    }

    /// Shorthand for a field pointing at a document with schema `fields`.
    pub fn pointer(name: impl Into<String>, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self {
            name: name.into(),
            is_pointer: true,
            fields: fields.into_iter().collect(),
        }
    }
}

impl From<&str> for FieldDef {
    fn from(name: &str) -> Self {
        Self::value(name)
    }
}

/// What a field read returns.
#[derive(Debug, Clone)]
pub enum DocumentField {
    Value(Value),
    Pointer(Arc<StoragePointer>),
}

impl DocumentField {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Pointer(_) => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&Arc<StoragePointer>> {
        match self {
            Self::Pointer(pointer) => Some(pointer),
            Self::Value(_) => None,
        }
    }
}

/// A downloaded document with its child pointers already built.
struct Document {
    values: Map<String, Value>,
    children: HashMap<String, Arc<StoragePointer>>,
}

/// Lazily resolved reference to an off-chain JSON document.
pub struct StoragePointer {
    reference: String,
    fields: Vec<FieldDef>,
    registry: Arc<AdapterRegistry>,
    /// Swapped for an empty cell on reset; readers holding the old cell
    /// finish against it.
    document: RwLock<Arc<OnceCell<Arc<Document>>>>,
}

impl StoragePointer {
    /// Creates a pointer. No I/O happens here.
    pub fn new(
        reference: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDef>,
        registry: Arc<AdapterRegistry>,
    ) -> Self {
        Self {
            reference: reference.into(),
            fields: fields.into_iter().collect(),
            registry,
            document: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    /// The URI this pointer addresses.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The declared schema.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Whether the document has been downloaded.
    pub fn is_downloaded(&self) -> bool {
        self.document
            .try_read()
            .is_ok_and(|cell| cell.initialized())
    }

    /// Reads a declared field, downloading the document on first access.
    ///
    /// Pointer fields return the child pointer itself, not its contents.
    /// Returns `None` when the document has no value for the field.
    pub async fn get(&self, name: &str) -> OffChainResult<Option<DocumentField>> {
        let def = self.field(name)?;
        let document = self.document().await?;

        if def.is_pointer {
            return Ok(document
                .children
                .get(name)
                .cloned()
                .map(DocumentField::Pointer));
        }
        Ok(document.values.get(name).cloned().map(DocumentField::Value))
    }

    /// Reads the raw JSON value of a declared field. For pointer fields this
    /// is the child's URI.
    pub async fn get_value(&self, name: &str) -> OffChainResult<Option<Value>> {
        self.field(name)?;
        let document = self.document().await?;
        Ok(document.values.get(name).cloned())
    }

    /// Returns the child pointer of a pointer field.
    pub async fn get_pointer(&self, name: &str) -> OffChainResult<Arc<StoragePointer>> {
        if !self.field(name)?.is_pointer {
            return Err(OffChainError::NotAPointer(name.to_string()));
        }
        let document = self.document().await?;
        document
            .children
            .get(name)
            .cloned()
            .ok_or_else(|| OffChainError::NotAPointer(name.to_string()))
    }

    /// Resolves the document into one JSON object, following pointers up to
    /// `depth` levels. Pointers beyond that are rendered as their URI.
    pub fn to_plain_object(&self, depth: usize) -> BoxFuture<'_, OffChainResult<Value>> {
        Box::pin(async move {
            let document = self.document().await?;
            let mut object = Map::new();

            for def in &self.fields {
                if def.is_pointer {
                    let Some(child) = document.children.get(&def.name) else {
                        continue;
                    };
                    let value = if depth == 0 {
                        Value::String(child.reference().to_string())
                    } else {
                        child.to_plain_object(depth - 1).await?
                    };
                    object.insert(def.name.clone(), value);
                } else if let Some(value) = document.values.get(&def.name) {
                    object.insert(def.name.clone(), value.clone());
                }
            }

            Ok(Value::Object(object))
        })
    }

    /// Drops the downloaded document so the next read fetches it again.
    /// Child pointers handed out earlier keep their own documents.
    pub async fn reset(&self) {
        *self.document.write().await = Arc::new(OnceCell::new());
        debug!("Reset {}", self.reference);
    }

    fn field(&self, name: &str) -> OffChainResult<&FieldDef> {
        self.fields
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| OffChainError::UndeclaredField(name.to_string()))
    }

    async fn document(&self) -> OffChainResult<Arc<Document>> {
        let cell = self.document.read().await.clone();
        let document = cell
            .get_or_try_init(|| async { self.download().await.map(Arc::new) })
            .await?;
        Ok(document.clone())
    }

    async fn download(&self) -> OffChainResult<Document> {
        let adapter = self.registry.adapter_for(&self.reference).await?;
        debug!("Downloading {} via {} adapter", self.reference, adapter.name());

        let raw = adapter
            .download(&self.reference)
            .await
            .map_err(|source| OffChainError::Download {
                uri: self.reference.clone(),
                source,
            })?;

        let values = match raw {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(values)) => values,
            Some(_) => {
                return Err(OffChainError::InvalidDocument {
                    uri: self.reference.clone(),
                });
            }
        };

        let mut children = HashMap::new();
        for def in self.fields.iter().filter(|def| def.is_pointer) {
            let reference = self.child_reference(&values, &def.name)?;
            let child = StoragePointer::new(reference, def.fields.clone(), self.registry.clone());
            children.insert(def.name.clone(), Arc::new(child));
        }

        Ok(Document { values, children })
    }

    fn child_reference(&self, values: &Map<String, Value>, name: &str) -> OffChainResult<String> {
        let invalid = |reason: String| OffChainError::InvalidPointer {
            uri: self.reference.clone(),
            field: name.to_string(),
            reason,
        };

        match values.get(name) {
            Some(Value::String(uri)) if !uri.is_empty() => Ok(uri.clone()),
            Some(Value::String(_)) => Err(invalid("empty uri".to_string())),
            Some(other) => Err(invalid(format!("expected a uri string, found {other}"))),
            None => Err(invalid("missing".to_string())),
        }
    }
}

impl fmt::Debug for StoragePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoragePointer")
            .field("reference", &self.reference)
            .field("fields", &self.fields)
            .field("downloaded", &self.is_downloaded())
            .finish()
    }
}
