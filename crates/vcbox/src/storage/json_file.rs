//! JSON file persistence — the whole snapshot in one file.
//!
//! Every save rewrites the entire file. Cost is O(total state) per mutation,
//! which keeps a single self-consistent file at all times. This is not meant
//! for large databases.
//!
//! Saves go to a sibling temporary file that is flushed to disk and then
//! renamed over the target, so a crash mid-write leaves either the old or the
//! new snapshot, never a torn one.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, VcBoxError};
use crate::storage::{decode_or_reset, Persistence};
use crate::store::Snapshot;

/// Snapshot persistence backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file for database `db_name` inside `dir`: `{dir}/{db_name}.json`.
    pub fn for_db(dir: impl AsRef<Path>, db_name: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{db_name}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file empty if it does not exist. Existing contents are
    /// left untouched.
    fn ensure_exists(&self) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// # Errors
    ///
    /// Returns `VcBoxError::Io` if the file cannot be created or read, for
    /// example when its parent directory is missing.
    fn load(&self) -> Result<Snapshot> {
        self.ensure_exists()?;
        let bytes = fs::read(&self.path)?;
        let snapshot = decode_or_reset(&bytes, &self.location());
        log::debug!(
            "loaded {} record(s) from {}",
            snapshot.record_count(),
            self.path.display()
        );
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Returns `VcBoxError::SerializationError` if a record cannot be
    /// encoded, or `VcBoxError::Io` for filesystem errors.
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        write_atomic(&self.path, json.as_bytes())?;
        log::debug!("saved {} byte(s) to {}", json.len(), self.path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `VcBoxError::NotFound` if the file does not exist.
    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VcBoxError::NotFound(
                format!("store file not found: {}", self.path.display()),
            )),
            Err(e) => Err(VcBoxError::Io(e)),
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Write `data` to `path` via a synced sibling temp file and a rename.
///
/// The parent directory is not created; a missing directory is an I/O
/// error for the caller to see.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(VcBoxError::Io(e));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
