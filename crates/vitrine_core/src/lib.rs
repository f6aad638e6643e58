//! Core data types for the Vitrine image resolution library.
//!
//! This crate holds the vocabulary shared by every other Vitrine crate: the
//! media categories that scope placeholders and failure caches, the typed
//! image reference parsed from backend JSON, and the resolved display URL.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod fields;
mod reference;
mod resolved;
mod video;

pub use category::MediaCategory;
pub use fields::MediaFields;
pub use reference::{ImageReference, ReferenceParts};
pub use resolved::{ResolvedUrl, is_http_url};
pub use video::{ThumbnailQuality, youtube_id, youtube_thumbnail, youtube_thumbnail_parts};
