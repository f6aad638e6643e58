//! Per-element image state machine.

use crate::{Fallback, FallbackContext, FallbackStep, ImageResolver};
use vitrine_core::{ImageReference, ResolvedUrl};

/// Where an image element is in its resolution lifecycle.
///
/// `Unresolved → Resolved → FallbackAttempted → … → Placeholder`.
/// No transition leaves `Placeholder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No source assigned yet
    Unresolved,
    /// Showing the source computed for the initial render
    Resolved(ResolvedUrl),
    /// Showing a fallback candidate
    FallbackAttempted {
        /// Candidate being shown
        url: ResolvedUrl,
        /// Rule that produced it
        step: FallbackStep,
    },
    /// Showing a placeholder, terminal
    Placeholder(ResolvedUrl),
}

impl SlotState {
    /// Source currently assigned, if any.
    pub fn url(&self) -> Option<&ResolvedUrl> {
        match self {
            SlotState::Unresolved => None,
            SlotState::Resolved(url)
            | SlotState::FallbackAttempted { url, .. }
            | SlotState::Placeholder(url) => Some(url),
        }
    }
}

/// One image element: its reference, its context and its current source.
///
/// The slot remembers every source it has assigned and never assigns one
/// twice, so a view re-rendering or an oscillating chain cannot loop.
///
/// # Example
///
/// ```
/// use vitrine_core::{ImageReference, MediaCategory};
/// use vitrine_resolve::{FallbackContext, ImageResolver, ImageSlot};
///
/// let resolver = ImageResolver::in_memory();
/// let mut slot = ImageSlot::new(
///     Some(ImageReference::url("https://img.youtube.com/vi/abc123/maxresdefault.jpg")),
///     FallbackContext::new(MediaCategory::Video),
/// );
///
/// slot.resolve(&resolver);
/// assert!(slot.on_error(&resolver).as_str().ends_with("/mqdefault.jpg"));
/// assert!(slot.on_error(&resolver).as_str().ends_with("/0.jpg"));
/// assert_eq!(slot.on_error(&resolver), "/images/placeholders/video.jpg");
/// assert_eq!(slot.on_error(&resolver), "/images/placeholders/video.jpg");
/// ```
#[derive(Debug, Clone)]
pub struct ImageSlot {
    reference: Option<ImageReference>,
    context: FallbackContext,
    state: SlotState,
    attempted: Vec<ResolvedUrl>,
}

impl ImageSlot {
    /// Slot for a reference that has not been rendered yet.
    pub fn new(reference: Option<ImageReference>, context: FallbackContext) -> Self {
        Self {
            reference,
            context,
            state: SlotState::Unresolved,
            attempted: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    /// Every source assigned so far, in order.
    pub fn attempts(&self) -> &[ResolvedUrl] {
        &self.attempted
    }

    /// Whether the slot reached its placeholder.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SlotState::Placeholder(_))
    }

    /// Assign the initial source. Later calls return the current source.
    pub fn resolve(&mut self, resolver: &ImageResolver) -> ResolvedUrl {
        if let Some(url) = self.state.url() {
            return url.clone();
        }

        let url = resolver.resolve_with(self.reference.as_ref(), &self.context);
        let state = if resolver.is_placeholder(url.as_str()) {
            SlotState::Placeholder(url.clone())
        } else {
            SlotState::Resolved(url.clone())
        };
        self.transition(state, url)
    }

    /// The current source failed to load; assign and return the next one.
    ///
    /// An unresolved slot is resolved instead. A slot showing its
    /// placeholder keeps it.
    pub fn on_error(&mut self, resolver: &ImageResolver) -> ResolvedUrl {
        let failed = match &self.state {
            SlotState::Unresolved => return self.resolve(resolver),
            SlotState::Placeholder(url) => return url.clone(),
            SlotState::Resolved(url) | SlotState::FallbackAttempted { url, .. } => url.clone(),
        };

        let fallback =
            resolver.on_load_error(failed.as_str(), self.reference.as_ref(), &self.context);

        match fallback {
            Fallback::Next(candidate) if candidate.is_placeholder() => {
                let url = candidate.into_url();
                self.transition(SlotState::Placeholder(url.clone()), url)
            }
            Fallback::Next(candidate) if self.attempted.contains(candidate.url()) => {
                tracing::debug!(url = %candidate.url(), "Candidate already tried, using placeholder");
                let url = resolver.placeholder(self.context.category);
                self.transition(SlotState::Placeholder(url.clone()), url)
            }
            Fallback::Next(candidate) => {
                let step = *candidate.step();
                let url = candidate.into_url();
                self.transition(
                    SlotState::FallbackAttempted {
                        url: url.clone(),
                        step,
                    },
                    url,
                )
            }
            Fallback::Done => self.transition(SlotState::Placeholder(failed.clone()), failed),
        }
    }

    fn transition(&mut self, state: SlotState, url: ResolvedUrl) -> ResolvedUrl {
        tracing::trace!(from = ?self.state, to = ?state, "Image slot transition");
        if !self.attempted.contains(&url) {
            self.attempted.push(url.clone());
        }
        self.state = state;
        url
    }
}
