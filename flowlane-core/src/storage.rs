//! Durable key-value storage for the board snapshot.
//!
//! The whole board lives in a single record under [`STORAGE_KEY`]. It is
//! read once at startup via [`load_state`] and overwritten after every
//! successful store action. Implementations:
//! - [`FileStorage`]: one JSON file per key, replaced atomically.
//! - [`MemoryStorage`]: shared in-memory map for tests and ephemeral runs.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::codec;
use crate::model::AppState;

/// Key under which the board snapshot is stored.
pub const STORAGE_KEY: &str = "flowlane-kanban-data";

/// Errors that can occur while reading or writing stored records.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading a record failed for a reason other than absence.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing a record failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The key cannot be mapped to a record location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The snapshot could not be encoded for writing.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] codec::CodecError),

    /// Could not determine the user's data directory.
    #[error("could not determine data directory (no HOME or XDG_DATA_HOME)")]
    NoDataDir,
}

/// A string-keyed store of string records, overwritten wholesale.
pub trait KeyValueStorage {
    /// Returns the record stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// File-backed storage: each key is a `<key>.json` file in one directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// record, so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory (`<data_dir>/flowlane`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoDataDir`] if the platform data directory
    /// cannot be determined.
    pub fn in_default_location() -> Result<Self, StorageError> {
        dirs::data_dir()
            .map(|dir| Self::new(dir.join("flowlane")))
            .ok_or(StorageError::NoDataDir)
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for empty keys or keys that
    /// would escape the storage directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write {
            path: self.dir.clone(),
            source: e,
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StorageError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::Write { path, source: e })
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    writes: usize,
}

/// In-memory storage. Clones share the same records.
///
/// Nothing survives the process; used by tests and `--ephemeral` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one record.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .inner
            .lock()
            .entries
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// Restores the board from storage.
///
/// A missing record, an unreadable record, or a record that fails to decode
/// all yield [`AppState::default`]; startup never fails because of storage.
/// A decoded snapshot is normalized before use.
pub fn load_state<S: KeyValueStorage + ?Sized>(storage: &S) -> AppState {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("no saved board found, starting with default project");
            return AppState::default();
        }
        Err(err) => {
            tracing::warn!(error = %err, "board storage unreadable, starting with default project");
            return AppState::default();
        }
    };

    match codec::decode(&raw) {
        Ok(mut state) => {
            let repairs = state.normalize();
            if repairs > 0 {
                tracing::warn!(repairs, "repaired inconsistent board snapshot");
            }
            tracing::info!(projects = state.projects.len(), "board restored");
            state
        }
        Err(err) => {
            tracing::warn!(error = %err, "saved board is corrupt, starting with default project");
            AppState::default()
        }
    }
}
