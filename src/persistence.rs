//! File-backed keyed persistence for the Jira bridge.
//!
//! The bridge stores a handful of small JSON records: the installation
//! credential under the fixed key `credential`, and one connection record per
//! room under `room.<roomId>`. Each record is one file in the data directory.
//!
//! # Atomic Writes
//!
//! Records are written atomically using a write-to-temp-then-rename pattern:
//! 1. Write to `<key>.json.tmp`
//! 2. fsync the file
//! 3. Rename to `<key>.json`
//! 4. fsync the directory
//!
//! This ensures that readers always see either the old or new record, never a
//! partial write. Replacing a record therefore has no window in which the
//! record is absent or duplicated.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid store key (contains path separators or other unsafe characters).
    #[error("invalid store key: contains unsafe characters: {0}")]
    InvalidKey(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Validates that a store key is safe to use as a filename.
///
/// A key is unsafe if it:
/// - Contains path separators (`/` or `\`)
/// - Contains null bytes
/// - Is empty
/// - Starts with a dot (hidden file, directory traversal)
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }

    if key.contains('/') || key.contains('\\') || key.contains('\0') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }

    if key.starts_with('.') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }

    Ok(())
}

/// Syncs a file's contents and metadata to disk.
fn fsync_file(file: &File) -> io::Result<()> {
    file.sync_all()
}

/// Syncs a directory to disk, ensuring directory entries are durable.
///
/// Without this, a rename may not survive a power loss even if the file
/// contents were synced.
fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(dir_path)?;
    dir.sync_all()
}

/// A keyed JSON store over a single data directory.
///
/// Each key maps to one `<key>.json` file. Keys are validated against path
/// traversal before any filesystem access.
#[derive(Debug, Clone)]
pub struct KeyedStore {
    dir: PathBuf,
}

impl KeyedStore {
    /// Creates a store over the given directory.
    ///
    /// The directory is created lazily on the first `save`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        KeyedStore { dir: dir.into() }
    }

    /// Returns the directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Saves a record atomically under the given key, replacing any previous
    /// record for that key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` for unsafe keys and `StoreError::Io`
    /// for filesystem errors.
    pub fn save<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        use std::io::Write;

        validate_key(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.record_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&bytes)?;
            fsync_file(&file)?;
        }

        // Atomic rename, then fsync the directory so the rename is durable
        std::fs::rename(&tmp_path, &path)?;
        fsync_dir(&self.dir)?;

        Ok(())
    }

    /// Loads the record stored under the given key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` (kind `NotFound`) if no record exists, and
    /// `StoreError::Json` if the file is malformed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        validate_key(key)?;
        let bytes = std::fs::read(self.record_path(key))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Attempts to load a record, returning `None` if it doesn't exist.
    ///
    /// Other errors (malformed JSON, unsafe key) are propagated.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.load(key) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Removes the record stored under the given key.
    ///
    /// Returns `true` if a record was removed, `false` if none existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        match std::fs::remove_file(self.record_path(key)) {
            Ok(()) => {
                fsync_dir(&self.dir)?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Lists the keys of all records whose key starts with the given prefix.
    ///
    /// Returns an empty list if the data directory doesn't exist yet. Temp
    /// files left over from interrupted writes are not listed.
    pub fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(key) = name.strip_suffix(".json") else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
