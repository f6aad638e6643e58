//! Tests for the per-category failure cache.

use std::sync::Arc;
use std::time::Duration;
use vitrine_cache::{FailureCache, FailureCacheConfig, FailureCacheConfigBuilder, ManualClock};
use vitrine_core::MediaCategory;
use vitrine_error::{BuilderErrorKind, VitrineErrorKind, VitrineResult};
use vitrine_storage::{KeyValueStore, MemoryStore, StorageError, StorageErrorKind};

const START: i64 = 1_700_000_000_000;

fn cache_with(
    category: MediaCategory,
    config: FailureCacheConfig,
    store: Arc<dyn KeyValueStore>,
) -> (FailureCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let cache = FailureCache::new(category, config, store).with_clock(clock.clone());
    (cache, clock)
}

/// Store whose every call fails, like disabled browser storage.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> VitrineResult<Option<String>> {
        Err(StorageError::new(StorageErrorKind::Unavailable("disabled".into())).into())
    }

    fn set(&self, _key: &str, _value: &str) -> VitrineResult<()> {
        Err(StorageError::new(StorageErrorKind::Unavailable("disabled".into())).into())
    }

    fn remove(&self, _key: &str) -> VitrineResult<()> {
        Err(StorageError::new(StorageErrorKind::Unavailable("disabled".into())).into())
    }
}

#[test]
fn test_record_then_has_failed() {
    let store = Arc::new(MemoryStore::new());
    let (cache, _clock) = cache_with(MediaCategory::Article, FailureCacheConfig::default(), store);

    assert!(!cache.has_failed("/uploads/news/a.jpg"));
    cache.record_failure("/uploads/news/a.jpg");
    assert!(cache.has_failed("/uploads/news/a.jpg"));
    assert!(!cache.has_failed("/uploads/news/b.jpg"));
}

#[test]
fn test_capacity_evicts_lowest_timestamp() {
    let store = Arc::new(MemoryStore::new());
    let (cache, clock) = cache_with(MediaCategory::Rental, FailureCacheConfig::default(), store);

    for i in 0..101 {
        cache.record_failure(&format!("/uploads/rentals/{i}.jpg"));
        clock.advance(Duration::from_millis(1));
    }

    assert_eq!(cache.len(), 100);
    assert!(!cache.has_failed("/uploads/rentals/0.jpg"));
    assert!(cache.has_failed("/uploads/rentals/1.jpg"));
    assert!(cache.has_failed("/uploads/rentals/100.jpg"));
}

#[test]
fn test_eviction_tie_breaks_by_url() {
    let store = Arc::new(MemoryStore::new());
    let (cache, _clock) = cache_with(MediaCategory::Rental, FailureCacheConfig::default(), store);

    // Frozen clock: every entry shares one timestamp.
    for i in 0..101 {
        cache.record_failure(&format!("/uploads/rentals/{i:03}.jpg"));
    }

    assert_eq!(cache.len(), 100);
    assert!(!cache.has_failed("/uploads/rentals/000.jpg"));
    assert!(cache.has_failed("/uploads/rentals/001.jpg"));
    assert!(cache.has_failed("/uploads/rentals/100.jpg"));
}

#[test]
fn test_zero_capacity_stores_nothing() {
    let store = Arc::new(MemoryStore::new());
    let config = FailureCacheConfig::default().with_capacity(0usize);
    let (cache, _clock) = cache_with(MediaCategory::Article, config, store);

    cache.record_failure("/uploads/news/a.jpg");
    cache.record_failure("/uploads/news/b.jpg");

    assert!(cache.is_empty());
    assert!(!cache.has_failed("/uploads/news/a.jpg"));
    assert!(!cache.has_failed("/uploads/news/b.jpg"));
}

#[test]
fn test_builder_rejects_zero_ttl() {
    let err = FailureCacheConfigBuilder::default()
        .ttl_seconds(0u64)
        .finish()
        .unwrap_err();

    match err.kind() {
        VitrineErrorKind::Builder(builder) => assert!(matches!(
            builder.kind(),
            BuilderErrorKind::ValidationFailed(message) if message.contains("ttl_seconds")
        )),
        other => panic!("expected builder error, got {other}"),
    }
}

#[test]
fn test_overwrite_does_not_evict() {
    let store = Arc::new(MemoryStore::new());
    let config = FailureCacheConfigBuilder::default()
        .capacity(2usize)
        .finish()
        .unwrap();
    let (cache, clock) = cache_with(MediaCategory::Vehicle, config, store);

    cache.record_failure("/a.jpg");
    clock.advance(Duration::from_millis(5));
    cache.record_failure("/b.jpg");
    clock.advance(Duration::from_millis(5));
    cache.record_failure("/a.jpg");

    assert_eq!(cache.len(), 2);
    let entries = cache.entries();
    assert_eq!(entries[0], ("/b.jpg".to_string(), START + 5));
    assert_eq!(entries[1], ("/a.jpg".to_string(), START + 10));
}

#[test]
fn test_expired_entry_is_not_failed() {
    let store = Arc::new(MemoryStore::new());
    let (cache, clock) = cache_with(MediaCategory::Gallery, FailureCacheConfig::default(), store);

    cache.record_failure("/uploads/gallery/x.jpg");
    clock.advance(Duration::from_secs(24 * 60 * 60));
    assert!(cache.has_failed("/uploads/gallery/x.jpg"));

    clock.advance(Duration::from_millis(1));
    assert!(!cache.has_failed("/uploads/gallery/x.jpg"));
    // Still stored until pruned
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.cleanup_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_record_prunes_expired_entries() {
    let store = Arc::new(MemoryStore::new());
    let (cache, clock) = cache_with(MediaCategory::Trailer, FailureCacheConfig::default(), store);

    cache.record_failure("/old.jpg");
    clock.advance(Duration::from_secs(25 * 60 * 60));
    cache.record_failure("/new.jpg");

    let urls: Vec<_> = cache.entries().into_iter().map(|(url, _)| url).collect();
    assert_eq!(urls, vec!["/new.jpg".to_string()]);
}

#[test]
fn test_categories_are_independent() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let articles = FailureCache::new(MediaCategory::Article, FailureCacheConfig::default(), store.clone())
        .with_clock(clock.clone());
    let rentals = FailureCache::new(MediaCategory::Rental, FailureCacheConfig::default(), store.clone())
        .with_clock(clock);

    articles.record_failure("/images/shared.jpg");

    assert!(articles.has_failed("/images/shared.jpg"));
    assert!(!rentals.has_failed("/images/shared.jpg"));
    assert!(store.get("failedNewsImages").unwrap().is_some());
    assert!(store.get("failedRentalImages").unwrap().is_none());
}

#[test]
fn test_persisted_layout_is_url_to_millis() {
    let store = Arc::new(MemoryStore::new());
    let (cache, _clock) = cache_with(MediaCategory::Video, FailureCacheConfig::default(), store.clone());

    cache.record_failure("https://img.youtube.com/vi/abc123/maxresdefault.jpg");

    let raw = store.get("failedVideoThumbnails").unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({"https://img.youtube.com/vi/abc123/maxresdefault.jpg": START})
    );
}

#[test]
fn test_corrupt_data_reads_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set("failedNewsImages", "not json at all").unwrap();
    let (cache, _clock) = cache_with(MediaCategory::Article, FailureCacheConfig::default(), store);

    assert!(!cache.has_failed("/x.jpg"));
    cache.record_failure("/x.jpg");
    assert!(cache.has_failed("/x.jpg"));
}

#[test]
fn test_float_and_garbage_timestamps() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            "failedNewsImages",
            &format!(r#"{{"/float.jpg": {}.0, "/text.jpg": "yesterday"}}"#, START),
        )
        .unwrap();
    let (cache, _clock) = cache_with(MediaCategory::Article, FailureCacheConfig::default(), store);

    assert!(cache.has_failed("/float.jpg"));
    assert!(!cache.has_failed("/text.jpg"));
}

#[test]
fn test_broken_store_is_always_miss() {
    let (cache, _clock) = cache_with(
        MediaCategory::Default,
        FailureCacheConfig::default(),
        Arc::new(BrokenStore),
    );

    cache.record_failure("/x.jpg");
    assert!(!cache.has_failed("/x.jpg"));
    assert!(cache.is_empty());
    cache.clear();
}

#[test]
fn test_quota_exceeded_write_is_swallowed() {
    let store = Arc::new(MemoryStore::with_quota(64));
    let (cache, _clock) = cache_with(MediaCategory::Article, FailureCacheConfig::default(), store);

    cache.record_failure("/short.jpg");
    assert!(cache.has_failed("/short.jpg"));

    let long = format!("/{}.jpg", "x".repeat(200));
    cache.record_failure(&long);
    assert!(!cache.has_failed(&long));
    assert!(cache.has_failed("/short.jpg"));
}

#[test]
fn test_disabled_cache_never_writes() {
    let store = Arc::new(MemoryStore::new());
    let config = FailureCacheConfig::default().with_enabled(false);
    let (cache, _clock) = cache_with(MediaCategory::Article, config, store.clone());

    cache.record_failure("/x.jpg");
    assert!(!cache.has_failed("/x.jpg"));
    assert!(store.is_empty());
}

#[test]
fn test_clear_removes_category_entry() {
    let store = Arc::new(MemoryStore::new());
    let (cache, _clock) = cache_with(MediaCategory::Article, FailureCacheConfig::default(), store.clone());

    cache.record_failure("/x.jpg");
    cache.clear();
    assert!(cache.is_empty());
    assert!(store.get("failedNewsImages").unwrap().is_none());
}
