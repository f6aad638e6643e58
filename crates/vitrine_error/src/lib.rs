//! Error types for the Vitrine image resolution library.
//!
//! Resolution itself never fails: malformed references resolve to `None` and
//! load failures are absorbed by the fallback chain. The errors here cover the
//! fallible edges around it, namely persistence adapters, configuration
//! loading, builder validation, and JSON input handled by the command line
//! tool.
//!
//! # Error Hierarchy
//!
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vitrine_error::{VitrineResult, ConfigError};
//!
//! fn load() -> VitrineResult<String> {
//!     Err(ConfigError::new("capacity must be positive"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod json;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{VitrineError, VitrineErrorKind, VitrineResult};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
