//! Image resolution facade used by views.

use crate::{Fallback, FallbackChain, FallbackContext, Normalizer, ResolverConfig};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use vitrine_cache::{Clock, FailureCache};
use vitrine_core::{
    ImageReference, MediaCategory, ResolvedUrl, ThumbnailQuality, youtube_id, youtube_thumbnail,
    youtube_thumbnail_parts,
};
use vitrine_storage::{KeyValueStore, MemoryStore};

/// Turns image references into display URLs and handles load failures.
///
/// Owns one [`FailureCache`] per [`MediaCategory`], all persisted through the
/// same [`KeyValueStore`]. Views call [`resolve`](Self::resolve) for the
/// initial source and [`on_load_error`](Self::on_load_error) from the image's
/// error handler. Neither ever fails: the worst outcome is the category
/// placeholder.
///
/// # Example
///
/// ```
/// use vitrine_core::{ImageReference, MediaCategory};
/// use vitrine_resolve::{Fallback, FallbackContext, ImageResolver};
///
/// let resolver = ImageResolver::in_memory();
/// let reference = ImageReference::url("https://bucket.s3.amazonaws.com/images/foo/bar.jpg");
///
/// let src = resolver.resolve(Some(&reference), MediaCategory::Article);
/// let next = resolver.on_load_error(
///     src.as_str(),
///     Some(&reference),
///     &FallbackContext::new(MediaCategory::Article),
/// );
/// assert_eq!(next.url().unwrap(), "/api/images/s3-proxy/foo/bar.jpg");
///
/// assert_eq!(
///     resolver.resolve(None, MediaCategory::Default),
///     "/images/placeholders/default.jpg"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ImageResolver {
    config: Arc<ResolverConfig>,
    normalizer: Normalizer,
    chain: FallbackChain,
    caches: HashMap<MediaCategory, FailureCache>,
}

impl ImageResolver {
    /// Create a resolver persisting failures through `store`.
    pub fn new(config: ResolverConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let config = Arc::new(config);
        let caches = MediaCategory::iter()
            .map(|category| {
                let cache =
                    FailureCache::new(category, config.failure_cache.clone(), store.clone());
                (category, cache)
            })
            .collect();

        tracing::debug!(
            proxy_prefix = %config.proxy_prefix,
            placeholder_dir = %config.placeholder_dir,
            "Creating new ImageResolver"
        );

        Self {
            normalizer: Normalizer::new(config.proxy_prefix.as_str()),
            chain: FallbackChain::new(config.clone()),
            config,
            caches,
        }
    }

    /// Resolver with default configuration and an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(ResolverConfig::default(), Arc::new(MemoryStore::new()))
    }

    /// Replace the time source of every failure cache.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.caches = self
            .caches
            .into_iter()
            .map(|(category, cache)| (category, cache.with_clock(clock.clone())))
            .collect();
        self
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Failure cache of a category.
    pub fn cache(&self, category: MediaCategory) -> &FailureCache {
        // Every category is inserted in `new`.
        &self.caches[&category]
    }

    /// Placeholder image of a category.
    pub fn placeholder(&self, category: MediaCategory) -> ResolvedUrl {
        self.config.placeholder_for(category)
    }

    /// Whether `url` is one of the placeholders.
    pub fn is_placeholder(&self, url: &str) -> bool {
        self.config.is_placeholder(url)
    }

    /// Normalize a reference without consulting failure caches.
    pub fn normalize(
        &self,
        reference: Option<&ImageReference>,
        category: MediaCategory,
    ) -> Option<ResolvedUrl> {
        reference.and_then(|r| self.normalizer.normalize(r, category))
    }

    /// Source for the initial render of an image.
    pub fn resolve(&self, reference: Option<&ImageReference>, category: MediaCategory) -> ResolvedUrl {
        self.resolve_with(reference, &FallbackContext::new(category))
    }

    /// Source for the initial render, with extra context.
    ///
    /// For video images a page URL is replaced by its thumbnail, and a known
    /// video id stands in for a missing reference. A URL already in the
    /// category's failure cache resolves to the placeholder.
    #[tracing::instrument(skip(self, reference), fields(category = %context.category))]
    pub fn resolve_with(
        &self,
        reference: Option<&ImageReference>,
        context: &FallbackContext,
    ) -> ResolvedUrl {
        let category = context.category;
        let mut resolved = self.normalize(reference, category);

        if category.supports_video_thumbnails() {
            resolved = match resolved {
                Some(url) => Some(video_page_thumbnail(&url).unwrap_or(url)),
                None => context
                    .known_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(|id| ResolvedUrl::new(youtube_thumbnail(id, ThumbnailQuality::FIRST))),
            };
        }

        match resolved {
            Some(url) if self.cache(category).has_failed(url.as_str()) => {
                tracing::debug!(url = %url, "URL failed recently, using placeholder");
                self.placeholder(category)
            }
            Some(url) => url,
            None => {
                tracing::trace!("No usable reference, using placeholder");
                self.placeholder(category)
            }
        }
    }

    /// Resolve a backend JSON value of any shape.
    pub fn resolve_json(&self, value: &JsonValue, category: MediaCategory) -> ResolvedUrl {
        self.resolve(ImageReference::from_json(value).as_ref(), category)
    }

    /// Resolve a list of references, dropping those with no usable field.
    pub fn resolve_all(
        &self,
        references: &[ImageReference],
        category: MediaCategory,
    ) -> Vec<ResolvedUrl> {
        let context = FallbackContext::new(category);
        references
            .iter()
            .filter(|r| self.normalizer.normalize(r, category).is_some())
            .map(|r| self.resolve_with(Some(r), &context))
            .collect()
    }

    /// Next source after `failed_url` failed to load.
    ///
    /// The video id is taken from `context`, or else from a YouTube URL in
    /// `reference`.
    pub fn on_load_error(
        &self,
        failed_url: &str,
        reference: Option<&ImageReference>,
        context: &FallbackContext,
    ) -> Fallback {
        let mut context = context.clone();
        if context.known_id.is_none() && context.category.supports_video_thumbnails() {
            context.known_id = reference.and_then(reference_video_id);
        }
        self.chain
            .next_candidate(failed_url, &context, self.cache(context.category))
    }
}

/// Thumbnail for a video page URL; `None` for anything else.
fn video_page_thumbnail(url: &ResolvedUrl) -> Option<ResolvedUrl> {
    if youtube_thumbnail_parts(url.as_str()).is_some() {
        return None;
    }
    youtube_id(url.as_str())
        .map(|id| ResolvedUrl::new(youtube_thumbnail(&id, ThumbnailQuality::FIRST)))
}

fn reference_video_id(reference: &ImageReference) -> Option<String> {
    match reference {
        ImageReference::Url(url) => youtube_id(url),
        ImageReference::Parts(parts) => parts
            .url
            .as_deref()
            .and_then(youtube_id)
            .or_else(|| parts.thumbnail.as_deref().and_then(youtube_id)),
    }
}
