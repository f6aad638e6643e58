//! Failed image URL cache implementation.

use crate::{Clock, FailureCacheConfig, SystemClock};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use vitrine_core::MediaCategory;
use vitrine_storage::KeyValueStore;

/// Persisted map of resolved URL to the epoch millisecond it failed at.
///
/// Each category owns one cache stored under its own key (see
/// [`MediaCategory::cache_key`]), so identical paths in different categories
/// never shadow each other. Every call reads the persisted map, and writes
/// are last-write-wins. Persistence errors are logged at debug level and
/// otherwise ignored: reads degrade to a miss and writes to a no-op.
///
/// # Example
///
/// ```
/// use vitrine_cache::{FailureCache, FailureCacheConfig};
/// use vitrine_core::MediaCategory;
/// use vitrine_storage::MemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let cache = FailureCache::new(MediaCategory::Article, FailureCacheConfig::default(), store);
///
/// assert!(!cache.has_failed("/uploads/news/x.jpg"));
/// cache.record_failure("/uploads/news/x.jpg");
/// assert!(cache.has_failed("/uploads/news/x.jpg"));
/// ```
#[derive(Clone)]
pub struct FailureCache {
    category: MediaCategory,
    config: FailureCacheConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for FailureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureCache")
            .field("category", &self.category)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FailureCache {
    /// Create a cache for `category` using the system clock.
    pub fn new(
        category: MediaCategory,
        config: FailureCacheConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        tracing::debug!(
            category = %category,
            ttl_seconds = config.ttl_seconds(),
            capacity = config.capacity(),
            enabled = config.enabled(),
            "Creating new FailureCache"
        );
        Self {
            category,
            config,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Category this cache belongs to.
    pub fn category(&self) -> MediaCategory {
        self.category
    }

    /// Configuration in effect.
    pub fn config(&self) -> &FailureCacheConfig {
        &self.config
    }

    /// Whether `url` failed within the TTL.
    #[tracing::instrument(skip(self), fields(category = %self.category))]
    pub fn has_failed(&self, url: &str) -> bool {
        if !self.config.enabled() {
            return false;
        }

        let now = self.clock.now_millis();
        let failed = self
            .load()
            .get(url)
            .is_some_and(|&failed_at| !self.is_expired(failed_at, now));

        tracing::trace!(failed, "Checked failure cache");
        failed
    }

    /// Remember that `url` failed to load just now.
    ///
    /// Expired entries are pruned first. When `url` is new and the cache is
    /// full, the entry with the lowest timestamp is evicted before inserting.
    #[tracing::instrument(skip(self), fields(category = %self.category))]
    pub fn record_failure(&self, url: &str) {
        if !self.config.enabled() {
            tracing::debug!("Failure cache disabled, skipping insert");
            return;
        }

        let now = self.clock.now_millis();
        let mut entries = self.load();
        entries.retain(|_, failed_at| !self.is_expired(*failed_at, now));

        if !entries.contains_key(url) {
            while !entries.is_empty() && entries.len() >= *self.config.capacity() {
                Self::evict_oldest(&mut entries);
            }
        }

        if *self.config.capacity() > 0 {
            entries.insert(url.to_string(), now);
        }

        tracing::debug!(cache_size = entries.len(), "Recorded image load failure");
        self.save(&entries);
    }

    /// Remembered URLs with their failure timestamps, oldest first.
    ///
    /// Expired entries are included until the next write or
    /// [`cleanup_expired`](Self::cleanup_expired).
    pub fn entries(&self) -> Vec<(String, i64)> {
        let mut entries: Vec<_> = self.load().into_iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Number of persisted entries.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries from the cache.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.load();
        let before = entries.len();

        entries.retain(|_, failed_at| !self.is_expired(*failed_at, now));

        let removed = before - entries.len();
        if removed > 0 {
            self.save(&entries);
            tracing::info!(
                category = %self.category,
                removed,
                remaining = entries.len(),
                "Cleaned up expired failure entries"
            );
        }
        removed
    }

    /// Forget every failure in this category.
    pub fn clear(&self) {
        match self.store.remove(self.category.cache_key()) {
            Ok(()) => tracing::info!(category = %self.category, "Cleared failure cache"),
            Err(e) => tracing::debug!(category = %self.category, error = %e, "Failed to clear failure cache"),
        }
    }

    fn is_expired(&self, failed_at: i64, now: i64) -> bool {
        now.saturating_sub(failed_at) > self.config.ttl_millis()
    }

    fn evict_oldest(entries: &mut HashMap<String, i64>) {
        let oldest = entries
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(url, _)| url.clone());

        if let Some(url) = oldest {
            tracing::debug!(url = %url, "Evicting oldest failure entry");
            entries.remove(&url);
        }
    }

    /// Read the persisted map. Unreadable data reads as empty, and entries
    /// whose timestamp is not a number are dropped.
    fn load(&self) -> HashMap<String, i64> {
        let key = self.category.cache_key();
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                tracing::debug!(key, error = %e, "Failure cache unreadable, treating as empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, JsonValue>>(&raw) {
            Ok(map) => map
                .into_iter()
                .filter_map(|(url, ts)| {
                    ts.as_i64()
                        .or_else(|| ts.as_f64().map(|f| f as i64))
                        .map(|ts| (url, ts))
                })
                .collect(),
            Err(e) => {
                tracing::debug!(key, error = %e, "Failure cache corrupt, treating as empty");
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, i64>) {
        let key = self.category.cache_key();
        let sorted: BTreeMap<_, _> = entries.iter().collect();

        let raw = match serde_json::to_string(&sorted) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(key, error = %e, "Failed to encode failure cache");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &raw) {
            tracing::debug!(key, error = %e, "Failed to persist failure cache");
        }
    }
}
