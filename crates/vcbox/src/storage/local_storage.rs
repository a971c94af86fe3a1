//! Local-storage persistence — snapshots kept as strings in a named
//! key-value area.
//!
//! A [`LocalStorage`] area maps entry names to serialized snapshots, the way
//! a browser's `localStorage` does. [`LocalStorage::global`] is shared by
//! the whole process; tests and embedders can create private areas with
//! [`LocalStorage::new`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::error::{Result, VcBoxError};
use crate::storage::{decode_or_reset, Persistence};
use crate::store::Snapshot;

/// A shared, named key-value area of strings.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl LocalStorage {
    /// A new, empty area.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide area.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<LocalStorage> = OnceLock::new();
        GLOBAL.get_or_init(LocalStorage::new).clone()
    }

    pub fn get_item(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn set_item(&self, name: &str, value: String) {
        self.lock().insert(name.to_string(), value);
    }

    /// Remove an entry, returning whether it existed.
    pub fn remove_item(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Snapshot persistence backed by one entry of a [`LocalStorage`] area.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    area: LocalStorage,
    name: String,
}

impl LocalStorageStore {
    pub fn new(area: LocalStorage, name: impl Into<String>) -> Self {
        Self {
            area,
            name: name.into(),
        }
    }
}

impl Persistence for LocalStorageStore {
    fn location(&self) -> String {
        format!("localStorage:{}", self.name)
    }

    fn load(&self) -> Result<Snapshot> {
        let raw = match self.area.get_item(&self.name) {
            Some(raw) => raw,
            None => {
                self.area.set_item(&self.name, String::new());
                String::new()
            }
        };
        Ok(decode_or_reset(raw.as_bytes(), &self.location()))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.area.set_item(&self.name, snapshot.to_json()?);
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.area.remove_item(&self.name) {
            Ok(())
        } else {
            Err(VcBoxError::NotFound(format!(
                "store entry not found: {}",
                self.location()
            )))
        }
    }
}
