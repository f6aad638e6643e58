//! Image reference resolution for the marketplace front end.
//!
//! Listing, rental, article and video records reference images as plain URLs,
//! legacy relative paths, or objects carrying `url`, `thumbnail` and storage
//! `key` fields. This crate turns them into display sources and, when a
//! source fails to load, walks a bounded fallback chain ending at a category
//! placeholder, so a view never shows a broken image.
//!
//! # Components
//!
//! - [`Normalizer`]: reference to display URL
//! - [`FallbackChain`]: failed URL to next candidate
//! - [`ImageResolver`]: facade owning per-category failure caches
//! - [`ImageSlot`]: per-element state machine on top of the resolver
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vitrine_core::MediaCategory;
//! use vitrine_resolve::ImageResolver;
//!
//! let resolver = ImageResolver::in_memory();
//! let src = resolver.resolve_json(&json!("uploads/news/x.jpg"), MediaCategory::Article);
//! assert_eq!(src, "/uploads/news/x.jpg");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod fallback;
mod normalize;
mod resolver;
mod slot;

pub use config::{DEFAULT_PLACEHOLDER_DIR, DEFAULT_PROXY_PREFIX, ResolverConfig};
pub use fallback::{Candidate, Fallback, FallbackChain, FallbackContext, FallbackStep};
pub use normalize::{Normalizer, collapse_duplicate_segments, normalize, normalize_key};
pub use resolver::ImageResolver;
pub use slot::{ImageSlot, SlotState};
