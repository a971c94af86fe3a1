//! Record store — the single source of truth for wallet state.
//!
//! A [`RecordStore`] holds one [`Snapshot`] and a [`ChangeListener`]. Every
//! mutation is applied in memory and then handed to the listener as
//! `(before, after)` before the mutating call returns. A store opened over a
//! [`Persistence`](crate::storage::Persistence) uses a listener that saves
//! the new snapshot, so a mutation is durable once the call returns `Ok`.
//!
//! If the listener fails the error is returned to the caller, but the
//! in-memory mutation is not rolled back. A crash at that point replays the
//! previous on-disk state on the next load.
//!
//! # Modules
//!
//! - [`snapshot`] — `Snapshot` and `Table`.
//! - [`records`] — typed records stored by the identifier, key, credential
//!   and message collaborators.
//! - [`tables`] — typed accessors built on the uniform table contract.

pub mod records;
pub mod snapshot;
pub mod tables;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, VcBoxError};
use crate::storage::{PersistOnChange, Persistence};

pub use snapshot::{Snapshot, Table, TableMap};

// ── Mutations ─────────────────────────────────────────────────────────────────

/// One table-level change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert or overwrite `key` in `table`.
    Put {
        table: Table,
        key: String,
        value: Value,
    },
    /// Remove `key` from `table` if present.
    Delete { table: Table, key: String },
}

impl Mutation {
    pub fn put(table: Table, key: impl Into<String>, value: Value) -> Self {
        Mutation::Put {
            table,
            key: key.into(),
            value,
        }
    }

    pub fn delete(table: Table, key: impl Into<String>) -> Self {
        Mutation::Delete {
            table,
            key: key.into(),
        }
    }
}

// ── Change notification ───────────────────────────────────────────────────────

/// Hook invoked after every mutation with the full old and new snapshots.
pub trait ChangeListener {
    fn on_change(&mut self, old: &Snapshot, new: &Snapshot) -> Result<()>;
}

impl<F> ChangeListener for F
where
    F: FnMut(&Snapshot, &Snapshot) -> Result<()>,
{
    fn on_change(&mut self, old: &Snapshot, new: &Snapshot) -> Result<()> {
        self(old, new)
    }
}

/// Listener that ignores every change.
struct NoopListener;

impl ChangeListener for NoopListener {
    fn on_change(&mut self, _old: &Snapshot, _new: &Snapshot) -> Result<()> {
        Ok(())
    }
}

// ── RecordStore ───────────────────────────────────────────────────────────────

/// In-memory record tables with synchronous change notification.
///
/// Callers serialize access; all mutations take `&mut self`.
pub struct RecordStore {
    snapshot: Snapshot,
    listener: Box<dyn ChangeListener + Send>,
}

impl RecordStore {
    /// Create a store from an initial snapshot and a listener.
    pub fn new(snapshot: Snapshot, listener: impl ChangeListener + Send + 'static) -> Self {
        Self {
            snapshot,
            listener: Box::new(listener),
        }
    }

    /// An empty store whose mutations are not persisted anywhere.
    pub fn in_memory() -> Self {
        Self::new(Snapshot::empty(), NoopListener)
    }

    /// Load a snapshot from `persistence` and save every later mutation
    /// back through it.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::Io` if the storage location cannot be created or
    /// read. Corrupt contents are not an error; the store starts empty.
    pub fn open(persistence: Arc<dyn Persistence>) -> Result<Self> {
        let snapshot = persistence.load()?;
        log::debug!(
            "opened record store at {} with {} record(s)",
            persistence.location(),
            snapshot.record_count()
        );
        Ok(Self::new(snapshot, PersistOnChange::new(persistence)))
    }

    /// Replace the change listener.
    pub fn set_listener(&mut self, listener: impl ChangeListener + Send + 'static) {
        self.listener = Box::new(listener);
    }

    /// The full current state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Look up a record.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::NotFound` if `key` is not in `table`.
    pub fn get(&self, table: Table, key: &str) -> Result<&Value> {
        self.snapshot
            .table(table)
            .get(key)
            .ok_or_else(|| VcBoxError::NotFound(format!("{table}/{key}")))
    }

    /// Look up a record and deserialize it.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::NotFound` if absent, or
    /// `VcBoxError::SerializationError` if the record has another shape.
    pub fn get_as<T: DeserializeOwned>(&self, table: Table, key: &str) -> Result<T> {
        let value = self.get(table, key)?;
        serde_json::from_value(value.clone())
            .map_err(|e| VcBoxError::SerializationError(format!("{table}/{key}: {e}")))
    }

    pub fn contains(&self, table: Table, key: &str) -> bool {
        self.snapshot.table(table).contains_key(key)
    }

    /// Number of records in `table`.
    pub fn len(&self, table: Table) -> usize {
        self.snapshot.table(table).len()
    }

    /// Keys of `table` in ascending order.
    pub fn keys(&self, table: Table) -> impl Iterator<Item = &str> {
        self.snapshot.table(table).keys().map(String::as_str)
    }

    /// Insert or overwrite a record, then notify.
    pub fn put(&mut self, table: Table, key: impl Into<String>, value: Value) -> Result<()> {
        self.apply([Mutation::put(table, key, value)])
    }

    /// Serialize `record` and store it under `key`.
    pub fn put_as<T: Serialize>(
        &mut self,
        table: Table,
        key: impl Into<String>,
        record: &T,
    ) -> Result<()> {
        let value = to_value(record)?;
        self.put(table, key, value)
    }

    /// Remove a record if present, then notify. Removing a missing key is
    /// not an error.
    pub fn delete(&mut self, table: Table, key: &str) -> Result<()> {
        self.apply([Mutation::delete(table, key)])
    }

    /// Apply a batch of mutations in order and notify the listener once.
    ///
    /// An empty batch changes nothing and does not notify.
    ///
    /// # Errors
    ///
    /// Returns whatever the listener returns. The batch stays applied in
    /// memory either way.
    pub fn apply(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> Result<()> {
        let mutations: Vec<Mutation> = mutations.into_iter().collect();
        if mutations.is_empty() {
            return Ok(());
        }

        let before = self.snapshot.clone();
        let count = mutations.len();
        for mutation in mutations {
            match mutation {
                Mutation::Put { table, key, value } => {
                    self.snapshot.table_mut(table).insert(key, value);
                }
                Mutation::Delete { table, key } => {
                    self.snapshot.table_mut(table).remove(&key);
                }
            }
        }
        log::debug!("applied {count} mutation(s)");

        self.listener.on_change(&before, &self.snapshot)
    }

    /// Supersede the entire state, then notify.
    pub fn replace(&mut self, snapshot: Snapshot) -> Result<()> {
        let before = std::mem::replace(&mut self.snapshot, snapshot);
        self.listener.on_change(&before, &self.snapshot)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.snapshot.record_count())
            .finish_non_exhaustive()
    }
}

pub(crate) fn to_value<T: Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| VcBoxError::SerializationError(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
