//! Shared test helpers for dataset tests.

#![allow(dead_code)]

use ledgerproxy_dataset::{FieldDef, SetterGroup};
use ledgerproxy_types::{RemoteError, RemoteResult, Value, WriteContext, WriteReceipt};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    values: HashMap<String, Value>,
    get_calls: HashMap<String, usize>,
    write_calls: HashMap<String, usize>,
    senders: Vec<String>,
    failing_getters: HashSet<String>,
    failing_setters: HashSet<String>,
    next_tx: u64,
}

/// In-memory stand-in for a remote contract: getters read from a map,
/// setters write into it, and every call is counted.
#[derive(Clone, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<Inner>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: &[(&str, Value)]) -> Self {
        let remote = Self::new();
        {
            let mut inner = remote.inner.lock().unwrap();
            for (name, value) in values {
                inner.values.insert(name.to_string(), value.clone());
            }
        }
        remote
    }

    /// A field whose getter reads `name` from this remote.
    pub fn field(&self, name: &str) -> FieldDef {
        let remote = self.clone();
        let field = name.to_string();
        FieldDef::new(name).with_getter(move || {
            let remote = remote.clone();
            let field = field.clone();
            async move { remote.read(&field).await }
        })
    }

    /// A setter group that writes the listed fields back into this remote.
    pub fn setter(&self, key: &str, fields: &[&str]) -> SetterGroup {
        let remote = self.clone();
        let group = key.to_string();
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        SetterGroup::new(key, move |ctx: &WriteContext, values| {
            let remote = remote.clone();
            let group = group.clone();
            let sender = ctx.sender.clone();
            let writes: Vec<(String, Option<Value>)> = fields
                .iter()
                .map(|f| (f.clone(), values.get(f).cloned()))
                .collect();
            async move { remote.write(&group, &sender, writes).await }
        })
    }

    async fn read(&self, field: &str) -> RemoteResult<Option<Value>> {
        let result = {
            let mut inner = self.inner.lock().unwrap();
            *inner.get_calls.entry(field.to_string()).or_default() += 1;
            if inner.failing_getters.contains(field) {
                Err(RemoteError::Call(format!("{field} unavailable")))
            } else {
                Ok(inner.values.get(field).cloned())
            }
        };
        tokio::task::yield_now().await;
        result
    }

    async fn write(
        &self,
        group: &str,
        sender: &str,
        writes: Vec<(String, Option<Value>)>,
    ) -> RemoteResult<WriteReceipt> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.lock().unwrap();
        *inner.write_calls.entry(group.to_string()).or_default() += 1;
        inner.senders.push(sender.to_string());
        if inner.failing_setters.contains(group) {
            return Err(RemoteError::Rejected(format!("{group} reverted")));
        }
        for (field, value) in writes {
            match value {
                Some(v) => inner.values.insert(field, v),
                None => inner.values.remove(&field),
            };
        }
        inner.next_tx += 1;
        Ok(WriteReceipt::new(format!("{group}-tx{}", inner.next_tx)))
    }

    pub fn get_calls(&self, field: &str) -> usize {
        self.inner.lock().unwrap().get_calls.get(field).copied().unwrap_or(0)
    }

    pub fn total_get_calls(&self) -> usize {
        self.inner.lock().unwrap().get_calls.values().sum()
    }

    pub fn write_calls(&self, group: &str) -> usize {
        self.inner.lock().unwrap().write_calls.get(group).copied().unwrap_or(0)
    }

    pub fn total_write_calls(&self) -> usize {
        self.inner.lock().unwrap().write_calls.values().sum()
    }

    pub fn senders(&self) -> Vec<String> {
        self.inner.lock().unwrap().senders.clone()
    }

    pub fn value(&self, field: &str) -> Option<Value> {
        self.inner.lock().unwrap().values.get(field).cloned()
    }

    pub fn put(&self, field: &str, value: Value) {
        self.inner.lock().unwrap().values.insert(field.to_string(), value);
    }

    pub fn fail_getter(&self, field: &str) {
        self.inner.lock().unwrap().failing_getters.insert(field.to_string());
    }

    pub fn heal_getter(&self, field: &str) {
        self.inner.lock().unwrap().failing_getters.remove(field);
    }

    pub fn fail_setter(&self, group: &str) {
        self.inner.lock().unwrap().failing_setters.insert(group.to_string());
    }
}
