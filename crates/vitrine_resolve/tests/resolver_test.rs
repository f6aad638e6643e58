//! Tests for the resolver facade and the per-element slot.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vitrine_cache::ManualClock;
use vitrine_core::{ImageReference, MediaCategory, MediaFields};
use vitrine_resolve::{
    FallbackContext, FallbackStep, ImageResolver, ImageSlot, ResolverConfig, SlotState,
};
use vitrine_storage::{FileSystemStore, KeyValueStore, MemoryStore};

#[test]
fn test_absent_reference_resolves_to_placeholder() {
    let resolver = ImageResolver::in_memory();

    for value in [json!(null), json!({}), json!(""), json!([])] {
        assert_eq!(
            resolver.resolve_json(&value, MediaCategory::Default),
            "/images/placeholders/default.jpg"
        );
    }
    assert_eq!(
        resolver.resolve(None, MediaCategory::Rental),
        "/images/placeholders/rental.jpg"
    );
}

#[test]
fn test_known_failed_url_resolves_to_placeholder() {
    let resolver = ImageResolver::in_memory();
    let reference = ImageReference::url("/uploads/news/broken.jpg");

    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Article),
        "/uploads/news/broken.jpg"
    );

    resolver.on_load_error(
        "/uploads/news/broken.jpg",
        Some(&reference),
        &FallbackContext::new(MediaCategory::Article),
    );

    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Article),
        "/images/placeholders/article.jpg"
    );
    // Other categories are unaffected
    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Rental),
        "/uploads/news/broken.jpg"
    );
}

#[test]
fn test_failure_expires_after_ttl() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let resolver = ImageResolver::in_memory().with_clock(clock.clone());
    let reference = ImageReference::url("/uploads/rentals/a.jpg");
    let context = FallbackContext::new(MediaCategory::Rental);

    resolver.on_load_error("/uploads/rentals/a.jpg", Some(&reference), &context);
    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Rental),
        "/images/placeholders/rental.jpg"
    );

    clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Rental),
        "/uploads/rentals/a.jpg"
    );
}

#[test]
fn test_video_page_url_becomes_thumbnail() {
    let resolver = ImageResolver::in_memory();
    let reference = ImageReference::url("https://www.youtube.com/watch?v=abc123");

    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Video),
        "https://img.youtube.com/vi/abc123/maxresdefault.jpg"
    );
    // Outside the video category the URL is left alone
    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Article),
        "https://www.youtube.com/watch?v=abc123"
    );
}

#[test]
fn test_known_id_stands_in_for_missing_reference() {
    let resolver = ImageResolver::in_memory();
    let context = FallbackContext::new(MediaCategory::Video).with_known_id("abc123");

    assert_eq!(
        resolver.resolve_with(None, &context),
        "https://img.youtube.com/vi/abc123/maxresdefault.jpg"
    );
}

#[test]
fn test_video_id_taken_from_reference() {
    let resolver = ImageResolver::in_memory();
    let reference =
        ImageReference::parts(Some("https://youtu.be/abc123"), Some("/uploads/videos/t.jpg"), None)
            .unwrap();

    let next = resolver.on_load_error(
        "/uploads/videos/custom.jpg",
        Some(&reference),
        &FallbackContext::new(MediaCategory::Video),
    );
    assert_eq!(
        next.url().unwrap(),
        "https://img.youtube.com/vi/abc123/maxresdefault.jpg"
    );
}

#[test]
fn test_resolve_all_drops_absent_references() {
    let resolver = ImageResolver::in_memory();
    let record = json!({
        "gallery": [
            {"url": "https://cdn.example.com/full/1.jpg", "thumbnail": "https://cdn.example.com/thumb/1.jpg"},
            {"thumbnail": "https://cdn.example.com/thumb/2.jpg"},
            {"key": "gallery/3.jpg"},
            "uploads/gallery/4.jpg",
        ]
    });

    let fields = MediaFields::from_json(&record);
    let urls = resolver.resolve_all(fields.gallery(), MediaCategory::Gallery);
    assert_eq!(
        urls,
        vec![
            "https://cdn.example.com/full/1.jpg",
            "/api/images/s3-proxy/gallery/3.jpg",
            "/uploads/gallery/4.jpg",
        ]
    );
}

#[test]
fn test_slot_s3_scenario() {
    let resolver = ImageResolver::in_memory();
    let reference = ImageReference::from_json(
        &json!({"url": "https://bucket.s3.amazonaws.com/images/images/foo/bar.jpg"}),
    );
    let mut slot = ImageSlot::new(reference, FallbackContext::new(MediaCategory::Article));

    assert_eq!(
        slot.resolve(&resolver),
        "https://bucket.s3.amazonaws.com/images/foo/bar.jpg"
    );
    assert_eq!(
        slot.on_error(&resolver),
        "/api/images/s3-proxy/foo/bar.jpg"
    );
    assert!(matches!(
        slot.state(),
        SlotState::FallbackAttempted {
            step: FallbackStep::StorageProxy,
            ..
        }
    ));
    assert_eq!(slot.on_error(&resolver), "/uploads/news/bar.jpg");
    assert_eq!(slot.on_error(&resolver), "/images/placeholders/article.jpg");
    assert!(slot.is_terminal());
    assert_eq!(slot.attempts().len(), 4);
}

#[test]
fn test_slot_video_scenario() {
    let resolver = ImageResolver::in_memory();
    let context = FallbackContext::new(MediaCategory::Video).with_known_id("abc123");
    let mut slot = ImageSlot::new(None, context);

    assert_eq!(
        slot.resolve(&resolver),
        "https://img.youtube.com/vi/abc123/maxresdefault.jpg"
    );
    assert_eq!(
        slot.on_error(&resolver),
        "https://img.youtube.com/vi/abc123/mqdefault.jpg"
    );
    assert_eq!(
        slot.on_error(&resolver),
        "https://img.youtube.com/vi/abc123/0.jpg"
    );

    let placeholder = slot.on_error(&resolver);
    assert_eq!(placeholder, "/images/placeholders/video.jpg");

    // Terminal: further failures change nothing
    assert_eq!(slot.on_error(&resolver), placeholder);
    assert_eq!(slot.on_error(&resolver), placeholder);
    assert_eq!(slot.state(), &SlotState::Placeholder(placeholder));
}

#[test]
fn test_slot_for_absent_reference_starts_terminal() {
    let resolver = ImageResolver::in_memory();
    let mut slot = ImageSlot::new(None, FallbackContext::new(MediaCategory::Transport));

    assert_eq!(slot.resolve(&resolver), "/images/placeholders/transport.jpg");
    assert!(slot.is_terminal());
    assert_eq!(slot.on_error(&resolver), "/images/placeholders/transport.jpg");
}

#[test]
fn test_slot_error_before_resolve_resolves() {
    let resolver = ImageResolver::in_memory();
    let mut slot = ImageSlot::new(
        Some(ImageReference::url("/uploads/trailers/t.jpg")),
        FallbackContext::new(MediaCategory::Trailer),
    );

    assert_eq!(slot.on_error(&resolver), "/uploads/trailers/t.jpg");
    assert!(matches!(slot.state(), SlotState::Resolved(_)));
}

#[test]
fn test_rerender_after_failure_short_circuits() {
    let resolver = ImageResolver::in_memory();
    let reference = ImageReference::url("https://old-cdn.example.com/x.jpg");
    let context = FallbackContext::new(MediaCategory::Vehicle);

    let mut first = ImageSlot::new(Some(reference.clone()), context.clone());
    first.resolve(&resolver);
    first.on_error(&resolver);

    // A fresh element for the same reference goes straight to the placeholder
    let mut second = ImageSlot::new(Some(reference), context);
    assert_eq!(second.resolve(&resolver), "/images/placeholders/vehicle.jpg");
    assert!(second.is_terminal());
}

#[test]
fn test_failures_persist_across_resolvers() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileSystemStore::new(temp_dir.path()).unwrap());
    let reference = ImageReference::url("/uploads/news/gone.jpg");

    let resolver = ImageResolver::new(ResolverConfig::default(), store.clone());
    resolver.on_load_error(
        "/uploads/news/gone.jpg",
        Some(&reference),
        &FallbackContext::new(MediaCategory::Article),
    );
    drop(resolver);

    let reopened = ImageResolver::new(ResolverConfig::default(), store);
    assert_eq!(
        reopened.resolve(Some(&reference), MediaCategory::Article),
        "/images/placeholders/article.jpg"
    );
    assert!(temp_dir.path().join("failedNewsImages.json").exists());
}

#[test]
fn test_disabled_cache_never_short_circuits() {
    let mut config = ResolverConfig::default();
    config.failure_cache = config.failure_cache.with_enabled(false);
    let store = Arc::new(MemoryStore::new());
    let resolver = ImageResolver::new(config, store.clone());
    let reference = ImageReference::url("/uploads/news/x.jpg");
    let context = FallbackContext::new(MediaCategory::Article);

    resolver.on_load_error("/uploads/news/x.jpg", Some(&reference), &context);
    assert_eq!(
        resolver.resolve(Some(&reference), MediaCategory::Article),
        "/uploads/news/x.jpg"
    );
    assert!(store.is_empty());
}
