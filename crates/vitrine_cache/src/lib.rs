//! Failed image URL caching with TTL support.
//!
//! Remembers which resolved URLs failed to load so that views re-rendering
//! the same broken reference skip straight to a placeholder instead of
//! hitting the network again. The cache is an optimization only: every
//! persistence error degrades it to an always-miss cache.

#![warn(missing_docs)]

mod cache;
mod clock;
mod config;

pub use cache::FailureCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FailureCacheConfig, FailureCacheConfigBuilder};
