//! Durable persistence for record store snapshots.
//!
//! A [`Persistence`] knows one storage location and can load, save and
//! remove a whole [`Snapshot`] there. Two adapters exist:
//!
//! - [`json_file`] — a JSON file on disk, `{dir}/{db_name}.json`.
//! - [`local_storage`] — a named entry in a process-wide key-value area,
//!   the counterpart of a browser's local storage.
//!
//! The adapter is chosen once, at construction, from [`StorageKind`].
//!
//! # Failure semantics
//!
//! - `load` never fails because the location is absent (it is created
//!   empty) or because its contents are corrupt (logged, then treated as a
//!   cold start).
//! - `save` failures propagate; there is no retry.
//! - `remove` fails with `NotFound` if the location does not exist.
//!
//! Only one writer per location is supported. Nothing coordinates two
//! processes writing the same file.

pub mod json_file;
pub mod local_storage;

use std::sync::Arc;

use crate::config::StorageKind;
use crate::error::Result;
use crate::store::{ChangeListener, Snapshot};

pub use json_file::JsonFileStore;
pub use local_storage::{LocalStorage, LocalStorageStore};

/// Load/save/remove capability over one storage location.
pub trait Persistence: Send + Sync {
    /// Human-readable location, for logs and messages.
    fn location(&self) -> String;

    /// Read the stored snapshot, creating an empty location if absent.
    fn load(&self) -> Result<Snapshot>;

    /// Replace the stored snapshot with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Delete the location.
    fn remove(&self) -> Result<()>;
}

/// Change listener that saves every new snapshot through a [`Persistence`].
pub struct PersistOnChange {
    persistence: Arc<dyn Persistence>,
}

impl PersistOnChange {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self { persistence }
    }
}

impl ChangeListener for PersistOnChange {
    fn on_change(&mut self, _old: &Snapshot, new: &Snapshot) -> Result<()> {
        self.persistence.save(new)
    }
}

/// Build the persistence adapter for `kind` and database `db_name`.
pub fn open_persistence(kind: &StorageKind, db_name: &str) -> Arc<dyn Persistence> {
    match kind {
        StorageKind::File { dir } => Arc::new(JsonFileStore::for_db(dir, db_name)),
        StorageKind::Local => Arc::new(LocalStorageStore::new(LocalStorage::global(), db_name)),
    }
}

/// Parse raw stored bytes, falling back to an empty snapshot on corruption.
pub(crate) fn decode_or_reset(bytes: &[u8], location: &str) -> Snapshot {
    match Snapshot::from_json_bytes(bytes) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn!("discarding unreadable store at {location}, starting empty: {e}");
            Snapshot::empty()
        }
    }
}
