//! Key-value storage backends
//!
//! The catalog persists into named slots holding JSON text. `FileStore`
//! keeps one file per slot under the data directory and writes atomically
//! (temp file, then rename). `MemoryStore` keeps slots in memory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};

/// Durable string slots addressed by key
///
/// `set` overwrites the previous value entirely.
pub trait KeyValueStore {
    /// Read a slot; `None` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot (no-op if absent)
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// File-backed slots: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone())
    }

    /// Path of the file backing a slot
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::read(path, source))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        atomic_write(&self.slot_path(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| StorageError::write(path, source))?;
        }
        Ok(())
    }
}

/// In-memory slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::write(temp_path.clone(), e))?;
    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| StorageError::write(temp_path.clone(), e))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::write(path.to_path_buf(), e))
}
