//! Per-field sync state and dataset lifecycle tracking.
//!
//! Field state lives next to the local and remote caches so that every
//! transition happens under one lock together with the cache it describes.

use ledgerproxy_types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Sync state of a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Never fetched (or invalidated) since the dataset was bound.
    #[default]
    Unsynced,
    /// Local value matches the last value read from or written to the remote store.
    Synced,
    /// Local value was changed and has not been written back yet.
    Dirty,
}

/// Lifecycle of the remote object backing a dataset.
///
/// `Fresh -> Deployed -> Obsolete`; `Obsolete` is terminal and may also be
/// entered straight from `Fresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Fresh,
    Deployed,
    Obsolete,
}

/// One-way deployed/obsolete flags.
#[derive(Debug, Default)]
pub(crate) struct LifecycleFlags {
    deployed: AtomicBool,
    obsolete: AtomicBool,
}

impl LifecycleFlags {
    pub(crate) fn new(deployed: bool) -> Self {
        Self {
            deployed: AtomicBool::new(deployed),
            obsolete: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_deployed(&self) -> bool {
        self.deployed.load(Ordering::SeqCst)
    }

    pub(crate) fn is_obsolete(&self) -> bool {
        self.obsolete.load(Ordering::SeqCst)
    }

    /// Returns `true` if this call performed the transition.
    pub(crate) fn set_deployed(&self) -> bool {
        !self.deployed.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` if this call performed the transition.
    pub(crate) fn set_obsolete(&self) -> bool {
        !self.obsolete.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn current(&self) -> Lifecycle {
        if self.is_obsolete() {
            Lifecycle::Obsolete
        } else if self.is_deployed() {
            Lifecycle::Deployed
        } else {
            Lifecycle::Fresh
        }
    }
}

/// Local and remote caches plus per-field state.
#[derive(Debug, Default)]
pub(crate) struct FieldCache {
    states: HashMap<String, FieldState>,
    local: HashMap<String, Value>,
    remote: HashMap<String, Value>,
}

impl FieldCache {
    pub(crate) fn state(&self, name: &str) -> FieldState {
        self.states.get(name).copied().unwrap_or_default()
    }

    pub(crate) fn local(&self, name: &str) -> Option<&Value> {
        self.local.get(name)
    }

    pub(crate) fn remote(&self, name: &str) -> Option<&Value> {
        self.remote.get(name)
    }

    pub(crate) fn local_snapshot(&self) -> HashMap<String, Value> {
        self.local.clone()
    }

    /// Stores a locally set value. Returns `false` when a synced or dirty
    /// field already holds `value`, in which case the state is left alone.
    /// An unsynced field always becomes dirty, since the next sync would
    /// otherwise overwrite the value.
    pub(crate) fn set_local(&mut self, name: &str, value: Value) -> bool {
        if self.state(name) != FieldState::Unsynced && self.local.get(name) == Some(&value) {
            return false;
        }
        self.local.insert(name.to_string(), value);
        self.states.insert(name.to_string(), FieldState::Dirty);
        true
    }

    /// Applies one batch of remote reads. Dirty fields keep their local value;
    /// only their remote mirror is refreshed.
    pub(crate) fn apply_remote(&mut self, fetched: Vec<(String, Option<Value>)>) {
        for (name, value) in fetched {
            match &value {
                Some(v) => {
                    self.remote.insert(name.clone(), v.clone());
                }
                None => {
                    self.remote.remove(&name);
                }
            }

            if self.state(&name) == FieldState::Dirty {
                continue;
            }

            match value {
                Some(v) => {
                    self.local.insert(name.clone(), v);
                }
                None => {
                    self.local.remove(&name);
                }
            }
            self.states.insert(name, FieldState::Synced);
        }
    }

    /// Records that `written` reached the remote store for `name`.
    /// The field only becomes synced if nobody changed it in the meantime.
    pub(crate) fn commit_written(&mut self, name: &str, written: Option<&Value>) -> bool {
        match written {
            Some(v) => {
                self.remote.insert(name.to_string(), v.clone());
            }
            None => {
                self.remote.remove(name);
            }
        }

        if self.local.get(name) != written {
            return false;
        }
        self.states.insert(name.to_string(), FieldState::Synced);
        true
    }

    /// Treats the current local value as already persisted.
    pub(crate) fn mark_synced(&mut self, name: &str) {
        match self.local.get(name) {
            Some(v) => {
                self.remote.insert(name.to_string(), v.clone());
            }
            None => {
                self.remote.remove(name);
            }
        }
        self.states.insert(name.to_string(), FieldState::Synced);
    }

    /// Turns every synced field back to unsynced. Dirty fields are untouched.
    pub(crate) fn invalidate(&mut self) -> usize {
        let mut count = 0;
        for state in self.states.values_mut() {
            if *state == FieldState::Synced {
                *state = FieldState::Unsynced;
                count += 1;
            }
        }
        count
    }
}
