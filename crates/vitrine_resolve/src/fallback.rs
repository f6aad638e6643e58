//! Load-failure fallback chain.
//!
//! Given a URL that failed to load, computes the next URL to try. The order
//! is fixed: storage proxy, conventional upload directory, video thumbnail
//! ladder, category placeholder. A placeholder that fails ends the chain.

use crate::ResolverConfig;
use crate::normalize::{Normalizer, file_name, split_host};
use std::sync::Arc;
use vitrine_cache::FailureCache;
use vitrine_core::{
    MediaCategory, ResolvedUrl, ThumbnailQuality, youtube_id, youtube_thumbnail,
    youtube_thumbnail_parts,
};

/// Which rule produced a fallback candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FallbackStep {
    /// Storage-bucket URL rewritten to the internal proxy
    #[display("storage-proxy")]
    StorageProxy,
    /// File name moved under the category's upload directory
    #[display("upload-directory")]
    UploadDirectory,
    /// Next size of an external video thumbnail
    #[display("video-thumbnail:{}", _0)]
    VideoThumbnail(ThumbnailQuality),
    /// Category placeholder, terminal
    #[display("placeholder")]
    Placeholder,
}

/// A URL to try next and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Candidate {
    url: ResolvedUrl,
    step: FallbackStep,
}

impl Candidate {
    /// Pair a URL with the step that produced it.
    pub fn new(url: ResolvedUrl, step: FallbackStep) -> Self {
        Self { url, step }
    }

    /// Whether this candidate is the terminal placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.step == FallbackStep::Placeholder
    }

    /// Take the URL out.
    pub fn into_url(self) -> ResolvedUrl {
        self.url
    }
}

/// Outcome of one fallback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Try this URL next
    Next(Candidate),
    /// The failed URL was already a placeholder; nothing more to try
    Done,
}

impl Fallback {
    /// URL to try next, if any.
    pub fn url(&self) -> Option<&ResolvedUrl> {
        match self {
            Fallback::Next(candidate) => Some(candidate.url()),
            Fallback::Done => None,
        }
    }

    /// Whether the chain has ended.
    pub fn is_done(&self) -> bool {
        matches!(self, Fallback::Done)
    }
}

/// What the chain knows about the image besides the failed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackContext {
    /// Category of the image
    pub category: MediaCategory,
    /// External video id, for video thumbnails
    pub known_id: Option<String>,
}

impl FallbackContext {
    /// Context without a known video id.
    pub fn new(category: MediaCategory) -> Self {
        Self {
            category,
            known_id: None,
        }
    }

    /// Attach a video id.
    pub fn with_known_id(mut self, id: impl Into<String>) -> Self {
        self.known_id = Some(id.into());
        self
    }
}

impl From<MediaCategory> for FallbackContext {
    fn from(category: MediaCategory) -> Self {
        Self::new(category)
    }
}

/// Computes fallback candidates for failed image loads.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    config: Arc<ResolverConfig>,
    normalizer: Normalizer,
}

impl FallbackChain {
    /// Create a chain from resolver configuration.
    pub fn new(config: Arc<ResolverConfig>) -> Self {
        let normalizer = Normalizer::new(config.proxy_prefix.as_str());
        Self { config, normalizer }
    }

    /// Record `failed_url` in `cache` and compute the next candidate.
    ///
    /// A URL that was already in the cache before this call has failed
    /// before, so the intermediate steps are skipped and the placeholder is
    /// returned straight away.
    #[tracing::instrument(skip(self, cache), fields(category = %context.category))]
    pub fn next_candidate(
        &self,
        failed_url: &str,
        context: &FallbackContext,
        cache: &FailureCache,
    ) -> Fallback {
        let repeated = cache.has_failed(failed_url);
        cache.record_failure(failed_url);
        self.plan(failed_url, context, repeated)
    }

    /// Compute the next candidate without touching any cache.
    ///
    /// `repeated` marks a URL known to have failed before.
    pub fn plan(&self, failed_url: &str, context: &FallbackContext, repeated: bool) -> Fallback {
        let failed = failed_url.trim();

        if self.config.is_placeholder(failed) {
            tracing::debug!(url = failed, "Placeholder failed to load, giving up");
            return Fallback::Done;
        }

        let candidate = if repeated {
            tracing::debug!(url = failed, "URL failed before, skipping to placeholder");
            None
        } else {
            self.storage_proxy(failed)
                .or_else(|| self.upload_directory(failed, context.category))
                .or_else(|| self.video_thumbnail(failed, context))
        };

        let candidate = candidate
            .filter(|c| c.url() != failed)
            .unwrap_or_else(|| self.placeholder(context.category));

        tracing::debug!(
            failed = failed,
            next = %candidate.url(),
            step = %candidate.step(),
            "Computed image fallback"
        );
        Fallback::Next(candidate)
    }

    /// Terminal candidate for a category.
    pub fn placeholder(&self, category: MediaCategory) -> Candidate {
        Candidate::new(
            self.config.placeholder_for(category),
            FallbackStep::Placeholder,
        )
    }

    fn storage_proxy(&self, failed: &str) -> Option<Candidate> {
        let (host, path) = split_host(failed)?;
        let host = host.to_ascii_lowercase();
        let on_storage_host = self
            .config
            .storage_hosts
            .iter()
            .any(|marker| host.contains(&marker.trim().to_ascii_lowercase()));
        if !on_storage_host {
            return None;
        }

        self.normalizer
            .proxy_path(path)
            .map(|url| Candidate::new(url, FallbackStep::StorageProxy))
    }

    fn upload_directory(&self, failed: &str, category: MediaCategory) -> Option<Candidate> {
        let dir = category.upload_dir()?;
        let name = file_name(failed)?;
        let rebuilt = format!("{}/{}", dir, name);

        (rebuilt != failed).then(|| {
            Candidate::new(ResolvedUrl::new(rebuilt), FallbackStep::UploadDirectory)
        })
    }

    fn video_thumbnail(&self, failed: &str, context: &FallbackContext) -> Option<Candidate> {
        if !context.category.supports_video_thumbnails() {
            return None;
        }

        let step = |id: &str, quality: ThumbnailQuality| {
            Candidate::new(
                ResolvedUrl::new(youtube_thumbnail(id, quality)),
                FallbackStep::VideoThumbnail(quality),
            )
        };

        if let Some((id, stem)) = youtube_thumbnail_parts(failed) {
            return match ThumbnailQuality::from_stem(&stem) {
                Some(quality) => quality.next().map(|next| step(&id, next)),
                None => Some(step(&id, ThumbnailQuality::FIRST)),
            };
        }

        context
            .known_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| youtube_id(failed))
            .map(|id| step(id.trim(), ThumbnailQuality::FIRST))
    }
}
