//! Field definitions and the remote accessor contract.
//!
//! A field is a named slot with an optional remote read accessor and an
//! optional remote write accessor. Both are supplied by the ledger client
//! and capture whatever remote identity they need.

use async_trait::async_trait;
use ledgerproxy_types::{RemoteResult, Value, WriteContext, WriteReceipt};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Reads the current remote value of one field.
#[async_trait]
pub trait RemoteGetter: Send + Sync {
    /// Returns `None` when the remote store holds no value.
    async fn fetch(&self) -> RemoteResult<Option<Value>>;
}

/// Persists one or more fields with a single remote write.
#[async_trait]
pub trait RemoteSetter: Send + Sync {
    async fn write(&self, ctx: &WriteContext, values: &FieldValues) -> RemoteResult<WriteReceipt>;
}

struct FnGetter<F>(F);

#[async_trait]
impl<F, Fut> RemoteGetter for FnGetter<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = RemoteResult<Option<Value>>> + Send + 'static,
{
    async fn fetch(&self) -> RemoteResult<Option<Value>> {
        (self.0)().await
    }
}

struct FnSetter<F>(F);

#[async_trait]
impl<F, Fut> RemoteSetter for FnSetter<F>
where
    F: Fn(&WriteContext, &FieldValues) -> Fut + Send + Sync,
    Fut: Future<Output = RemoteResult<WriteReceipt>> + Send + 'static,
{
    async fn write(&self, ctx: &WriteContext, values: &FieldValues) -> RemoteResult<WriteReceipt> {
        (self.0)(ctx, values).await
    }
}

/// Snapshot of a dataset's local values handed to setters during a flush.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues(HashMap<String, Value>);

impl FieldValues {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Shorthand for string-valued fields.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Value>> for FieldValues {
    fn from(values: HashMap<String, Value>) -> Self {
        Self(values)
    }
}

/// A remote setter with an explicit identity.
///
/// Every dirty field carrying the same group key is persisted by one setter
/// call per flush, whichever of those fields became dirty.
#[derive(Clone)]
pub struct SetterGroup {
    key: Arc<str>,
    setter: Arc<dyn RemoteSetter>,
}

impl SetterGroup {
    /// Builds a group from a closure.
    pub fn new<F, Fut>(key: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&WriteContext, &FieldValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RemoteResult<WriteReceipt>> + Send + 'static,
    {
        Self::from_setter(key, Arc::new(FnSetter(setter)))
    }

    /// Builds a group around an existing setter implementation.
    pub fn from_setter(key: impl Into<String>, setter: Arc<dyn RemoteSetter>) -> Self {
        Self {
            key: Arc::from(key.into()),
            setter,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn setter(&self) -> &Arc<dyn RemoteSetter> {
        &self.setter
    }
}

impl fmt::Debug for SetterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetterGroup").field("key", &self.key).finish()
    }
}

/// Declares one field of a dataset.
#[derive(Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) getter: Option<Arc<dyn RemoteGetter>>,
    pub(crate) setter: Option<SetterGroup>,
}

impl FieldDef {
    /// A local-only field: never fetched, never written.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            getter: None,
            setter: None,
        }
    }

    /// Attaches a closure as the remote getter.
    #[must_use]
    pub fn with_getter<F, Fut>(self, getter: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RemoteResult<Option<Value>>> + Send + 'static,
    {
        self.with_remote_getter(Arc::new(FnGetter(getter)))
    }

    #[must_use]
    pub fn with_remote_getter(mut self, getter: Arc<dyn RemoteGetter>) -> Self {
        self.getter = Some(getter);
        self
    }

    #[must_use]
    pub fn with_setter(mut self, group: SetterGroup) -> Self {
        self.setter = Some(group);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    pub fn setter_key(&self) -> Option<&str> {
        self.setter.as_ref().map(SetterGroup::key)
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter_key())
            .finish()
    }
}
