//! Vitrine - image reference resolution for the marketplace front end.
//!
//! Vehicle listings, rentals, trailers, transport routes, news and videos all
//! carry images whose references come in several shapes: absolute URLs,
//! legacy relative paths, storage keys, and objects mixing them. Vitrine turns
//! any of these into a display source and, when that source fails to load,
//! walks a bounded fallback chain down to a category placeholder.
//!
//! # Quick Start
//!
//! ```rust
//! use vitrine::{FallbackContext, ImageReference, ImageResolver, ImageSlot, MediaCategory};
//!
//! let resolver = ImageResolver::in_memory();
//! let mut slot = ImageSlot::new(
//!     Some(ImageReference::url("https://bucket.s3.amazonaws.com/images/images/foo/bar.jpg")),
//!     FallbackContext::new(MediaCategory::Article),
//! );
//!
//! // Initial render
//! let src = slot.resolve(&resolver);
//! assert_eq!(src, "https://bucket.s3.amazonaws.com/images/foo/bar.jpg");
//!
//! // The image's error handler fired
//! let src = slot.on_error(&resolver);
//! assert_eq!(src, "/api/images/s3-proxy/foo/bar.jpg");
//! ```
//!
//! # Architecture
//!
//! - `vitrine_core` - Categories, references, resolved URLs
//! - `vitrine_error` - Error types
//! - `vitrine_storage` - Key-value persistence ports
//! - `vitrine_cache` - Per-category failure cache
//! - `vitrine_resolve` - Normalizer, fallback chain, resolver, slots
//!
//! This crate (`vitrine`) re-exports everything for convenience.

pub use vitrine_cache::*;
pub use vitrine_core::*;
pub use vitrine_error::*;
pub use vitrine_resolve::*;
pub use vitrine_storage::*;
