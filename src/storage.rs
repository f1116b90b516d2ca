//! Key/value storage slots and file blobs.
//!
//! The config store persists through the `Storage` trait so the backing
//! medium stays swappable:
//! - `MemoryStorage`: process-local map, used by tests and dry runs
//! - `FileStorage`: one `<key>.json` file per slot under a data directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::StorageError;

/// Backend-agnostic key/value slot storage.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (overwrite) a slot.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing a missing slot is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

/// File-backed storage rooted at a data directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `base_path`. Directories are created lazily on write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a slot key to its file path.
    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_name(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }

    /// Write a named blob (e.g. a config export) and return where it landed.
    pub async fn write_blob(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        validate_name(file_name)?;
        let path = self.base_path.join(file_name);
        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Slot keys and blob names are single path components: `[A-Za-z0-9._-]`, no leading dot.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(name.to_string()))
    }
}
