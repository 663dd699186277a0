//! Remote-backed datasets: a local field cache mirroring a remote object.
//!
//! Reads are lazy: the first read of an unsynced field on a deployed dataset
//! fetches every unsynced field in one concurrent batch. Writes are local
//! until [`RemoteBackedDataset::flush_writes`] pushes dirty fields through
//! their setters, calling each setter group once.

use crate::error::{DatasetError, DatasetResult};
use crate::field::{FieldDef, FieldValues, RemoteGetter, SetterGroup};
use crate::state::{FieldCache, FieldState, Lifecycle, LifecycleFlags};
use futures::future::{join_all, try_join_all};
use ledgerproxy_types::{DatasetId, Value, WriteContext, WriteReceipt};
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

struct FieldBinding {
    getter: Option<Arc<dyn RemoteGetter>>,
    setter: Option<SetterGroup>,
}

/// Dirty fields that one setter call will persist.
struct WriteBatch {
    group: SetterGroup,
    fields: Vec<String>,
}

/// A set of named fields whose authoritative values live in a remote store.
pub struct RemoteBackedDataset {
    id: DatasetId,
    /// Field names in declaration order.
    order: Vec<String>,
    bindings: HashMap<String, FieldBinding>,
    cache: RwLock<FieldCache>,
    lifecycle: LifecycleFlags,
    /// Serializes remote rounds and holds the outcome of the last sync, which
    /// callers that queued behind that sync receive instead of starting their own.
    remote_round: Mutex<Option<DatasetResult<usize>>>,
    /// Number of sync rounds completed.
    rounds: AtomicU64,
}

impl RemoteBackedDataset {
    /// Binds fields to a dataset whose remote object does not exist yet.
    pub fn bind(fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self::with_lifecycle(fields, false)
    }

    /// Binds fields to a dataset backed by an existing remote object.
    pub fn bind_deployed(fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self::with_lifecycle(fields, true)
    }

    fn with_lifecycle(fields: impl IntoIterator<Item = FieldDef>, deployed: bool) -> Self {
        let mut order = Vec::new();
        let mut bindings = HashMap::new();

        for def in fields {
            let binding = FieldBinding {
                getter: def.getter,
                setter: def.setter,
            };
            // Re-binding a name replaces the earlier definition in place.
            if bindings.insert(def.name.clone(), binding).is_none() {
                order.push(def.name);
            }
        }

        let id = DatasetId::new();
        debug!("Bound dataset {} with {} fields (deployed: {})", id, order.len(), deployed);

        Self {
            id,
            order,
            bindings,
            cache: RwLock::new(FieldCache::default()),
            lifecycle: LifecycleFlags::new(deployed),
            remote_round: Mutex::new(None),
            rounds: AtomicU64::new(0),
        }
    }

    /// Returns this dataset's identifier.
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Returns field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.order
    }

    pub fn is_deployed(&self) -> bool {
        self.lifecycle.is_deployed()
    }

    pub fn is_obsolete(&self) -> bool {
        self.lifecycle.is_obsolete()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.current()
    }

    /// Records that the remote object now exists. Idempotent.
    pub fn mark_deployed(&self) -> DatasetResult<()> {
        self.ensure_live("mark_deployed")?;
        if self.lifecycle.set_deployed() {
            info!("Dataset {} deployed", self.id);
        }
        Ok(())
    }

    /// Records that the remote object was destroyed. Terminal and idempotent.
    pub fn mark_obsolete(&self) {
        if self.lifecycle.set_obsolete() {
            info!("Dataset {} marked obsolete", self.id);
        }
    }

    // ── Field access ─────────────────────────────────────────────

    /// Reads a field, syncing the dataset first if the field was never fetched.
    pub async fn get(&self, name: &str) -> DatasetResult<Option<Value>> {
        self.ensure_live("get")?;
        let binding = self.binding(name)?;

        // Local-only fields never take part in a remote round.
        let needs_sync = binding.getter.is_some()
            && self.is_deployed()
            && self.cache.read().await.state(name) == FieldState::Unsynced;
        if needs_sync {
            self.sync_all().await?;
        }

        self.ensure_live("get")?;
        Ok(self.cache.read().await.local(name).cloned())
    }

    /// Writes a field locally. Setting the current value again changes nothing.
    pub async fn set(&self, name: &str, value: Value) -> DatasetResult<()> {
        self.ensure_live("set")?;
        self.binding(name)?;

        let mut cache = self.cache.write().await;
        if cache.set_local(name, value) {
            debug!("Dataset {}: field `{}` is dirty", self.id, name);
        }
        Ok(())
    }

    /// Returns the sync state of one field.
    pub async fn field_state(&self, name: &str) -> DatasetResult<FieldState> {
        self.binding(name)?;
        Ok(self.cache.read().await.state(name))
    }

    /// Returns the value last read from or written to the remote store.
    pub async fn remote_value(&self, name: &str) -> DatasetResult<Option<Value>> {
        self.binding(name)?;
        Ok(self.cache.read().await.remote(name).cloned())
    }

    /// Returns dirty field names in declaration order.
    pub async fn dirty_fields(&self) -> Vec<String> {
        let cache = self.cache.read().await;
        self.order
            .iter()
            .filter(|name| cache.state(name) == FieldState::Dirty)
            .cloned()
            .collect()
    }

    /// Records that the remote store already holds the local values of `names`,
    /// e.g. because the write that provisioned the remote object carried them.
    pub async fn mark_synced(&self, names: &[&str]) -> DatasetResult<()> {
        self.ensure_live("mark_synced")?;
        for name in names {
            self.binding(name)?;
        }

        let mut cache = self.cache.write().await;
        for name in names {
            cache.mark_synced(name);
        }
        Ok(())
    }

    /// Forgets what was fetched so the next read goes back to the remote store.
    /// Dirty fields keep their local values.
    pub async fn invalidate(&self) -> DatasetResult<()> {
        self.ensure_live("invalidate")?;
        let count = self.cache.write().await.invalidate();
        debug!("Dataset {}: invalidated {} fields", self.id, count);
        Ok(())
    }

    /// Collects every local value into one JSON object, syncing first when deployed.
    pub async fn to_plain_object(&self) -> DatasetResult<Value> {
        self.ensure_live("to_plain_object")?;
        if self.is_deployed() {
            self.sync_all().await?;
        }

        let cache = self.cache.read().await;
        let mut object = Map::new();
        for name in &self.order {
            if let Some(value) = cache.local(name) {
                object.insert(name.clone(), value.clone());
            }
        }
        Ok(Value::Object(object))
    }

    // ── Remote rounds ────────────────────────────────────────────

    /// Fetches every unsynced field that has a getter, concurrently.
    ///
    /// Returns how many fields were fetched. A fresh dataset has nothing to
    /// read yet and returns `0`. Callers that arrive while a round is in
    /// flight wait for it and share its outcome, failure included; only a
    /// caller arriving after a round has finished starts a new one.
    pub async fn sync_all(&self) -> DatasetResult<usize> {
        let seen = self.rounds.load(Ordering::Acquire);
        let mut last = self.remote_round.lock().await;

        if self.rounds.load(Ordering::Acquire) != seen {
            if let Some(outcome) = last.as_ref() {
                debug!("Dataset {}: joined the sync round in flight", self.id);
                return outcome.clone();
            }
        }
        self.sync_round(&mut last).await
    }

    /// Writes every dirty field that has a setter.
    ///
    /// Unsynced fields are fetched first. Fields sharing a setter group are
    /// written by one call; receipts come back in the order the groups were
    /// scheduled. If any setter fails, the first failure is returned and the
    /// fields whose setters succeeded stay synced.
    pub async fn flush_writes(&self, ctx: &WriteContext) -> DatasetResult<Vec<WriteReceipt>> {
        let mut last = self.remote_round.lock().await;
        self.ensure_live("flush_writes")?;
        if !self.is_deployed() {
            return Err(DatasetError::NotDeployed(self.id));
        }

        self.sync_round(&mut last).await?;

        let (batches, values) = {
            let cache = self.cache.read().await;
            (self.schedule_writes(&cache), FieldValues::from(cache.local_snapshot()))
        };
        if batches.is_empty() {
            debug!("Dataset {}: nothing to flush", self.id);
            return Ok(Vec::new());
        }

        debug!(
            "Dataset {}: flushing {} writes for {} fields",
            self.id,
            batches.len(),
            batches.iter().map(|b| b.fields.len()).sum::<usize>()
        );

        let results = join_all(
            batches
                .iter()
                .map(|batch| batch.group.setter().write(ctx, &values)),
        )
        .await;

        let mut cache = self.cache.write().await;
        let mut receipts = Vec::with_capacity(batches.len());
        let mut failure = None;

        for (batch, result) in batches.into_iter().zip(results) {
            match result {
                Ok(receipt) => {
                    for name in &batch.fields {
                        if !cache.commit_written(name, values.get(name)) {
                            debug!("Dataset {}: `{}` changed during write, still dirty", self.id, name);
                        }
                    }
                    receipts.push(receipt);
                }
                Err(source) => {
                    warn!(
                        "Dataset {}: setter `{}` failed: {}",
                        self.id,
                        batch.group.key(),
                        source
                    );
                    if failure.is_none() {
                        failure = Some(DatasetError::WriteFailure {
                            fields: batch.fields,
                            source,
                        });
                    }
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(receipts),
        }
    }

    /// Runs one read round and publishes its outcome. `last` is the guarded
    /// slot of `remote_round`.
    async fn sync_round(&self, last: &mut Option<DatasetResult<usize>>) -> DatasetResult<usize> {
        let outcome = self.sync_unsynced().await;
        *last = Some(outcome.clone());
        self.rounds.fetch_add(1, Ordering::Release);
        outcome
    }

    async fn sync_unsynced(&self) -> DatasetResult<usize> {
        self.ensure_live("sync")?;
        if !self.is_deployed() {
            return Ok(0);
        }

        let pending: Vec<(&str, Arc<dyn RemoteGetter>)> = {
            let cache = self.cache.read().await;
            self.order
                .iter()
                .filter(|name| cache.state(name) == FieldState::Unsynced)
                .filter_map(|name| {
                    self.bindings[name]
                        .getter
                        .clone()
                        .map(|getter| (name.as_str(), getter))
                })
                .collect()
        };
        if pending.is_empty() {
            return Ok(0);
        }

        debug!("Dataset {}: fetching {} fields", self.id, pending.len());

        let fetched = try_join_all(pending.iter().map(|(name, getter)| async move {
            getter
                .fetch()
                .await
                .map(|value| (name.to_string(), value))
                .map_err(|source| DatasetError::RemoteSync {
                    field: name.to_string(),
                    source,
                })
        }))
        .await
        .inspect_err(|e| warn!("Dataset {}: sync failed: {}", self.id, e))?;

        self.ensure_live("sync")?;
        let count = fetched.len();
        self.cache.write().await.apply_remote(fetched);
        Ok(count)
    }

    fn schedule_writes(&self, cache: &FieldCache) -> Vec<WriteBatch> {
        let mut batches: Vec<WriteBatch> = Vec::new();

        for name in &self.order {
            if cache.state(name) != FieldState::Dirty {
                continue;
            }
            let Some(group) = &self.bindings[name].setter else {
                debug!("Dataset {}: `{}` has no setter, left dirty", self.id, name);
                continue;
            };

            match batches.iter_mut().find(|b| b.group.key() == group.key()) {
                Some(batch) => batch.fields.push(name.clone()),
                None => batches.push(WriteBatch {
                    group: group.clone(),
                    fields: vec![name.clone()],
                }),
            }
        }

        batches
    }

    fn binding(&self, name: &str) -> DatasetResult<&FieldBinding> {
        self.bindings
            .get(name)
            .ok_or_else(|| DatasetError::UnknownField(name.to_string()))
    }

    fn ensure_live(&self, operation: &'static str) -> DatasetResult<()> {
        if self.is_obsolete() {
            return Err(DatasetError::ObsoleteAccess {
                dataset: self.id,
                operation,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RemoteBackedDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackedDataset")
            .field("id", &self.id)
            .field("fields", &self.order)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}
