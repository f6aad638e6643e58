//! In-memory storage backend.

use crate::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use vitrine_error::{StorageError, StorageErrorKind, VitrineResult};

/// Mutex-guarded map standing in for browser local storage.
///
/// An optional quota caps the total bytes of keys plus values, reproducing
/// the quota failures real local storage raises once full.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> VitrineResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::Unavailable(format!(
                "memory store lock poisoned: {}",
                e
            )))
            .into()
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VitrineResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VitrineResult<()> {
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                tracing::debug!(key, needed, quota, "Memory store quota exceeded");
                return Err(StorageError::new(StorageErrorKind::QuotaExceeded(format!(
                    "{}: {} bytes needed, {} allowed",
                    key, needed, quota
                )))
                .into());
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VitrineResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
