//! Filesystem-based key-value storage.
//!
//! Each key maps to `{base_path}/{key}.json`. Writes go through a temporary
//! file and a rename so a crash never leaves a half-written cache behind.

use crate::KeyValueStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use vitrine_error::{StorageError, StorageErrorKind, VitrineResult};

/// Distinguishes concurrent writes from the same process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem storage backend.
///
/// # Example Structure
///
/// ```text
/// ~/.cache/vitrine/
/// ├── failedNewsImages.json
/// ├── failedRentalImages.json
/// └── failedVideoThumbnails.json
/// ```
///
/// Keys are restricted to ASCII letters, digits, `_` and `-` so that a key can
/// never escape the base directory.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem store.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> VitrineResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened filesystem store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> VitrineResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())).into());
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileSystemStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> VitrineResult<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(size = value.len()))]
    fn set(&self, key: &str, value: &str) -> VitrineResult<()> {
        let path = self.path_for(key)?;

        // Write to a temp file unique to this write, then rename over the key
        let temp_path = self.base_path.join(format!(
            "{}.{}.{}.tmp",
            key,
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&temp_path, value).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), "Stored entry");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn remove(&self, key: &str) -> VitrineResult<()> {
        let path = self.path_for(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed entry");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}
