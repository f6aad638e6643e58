//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, JsonError, StorageError};

/// Every error condition the Vitrine crates can report.
///
/// # Examples
///
/// ```
/// use vitrine_error::{VitrineError, JsonError};
///
/// let err: VitrineError = JsonError::new("expected value").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VitrineErrorKind {
    /// Persistence adapter error
    #[from(StorageError)]
    Storage(StorageError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder validation error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Vitrine error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vitrine_error::{VitrineResult, StorageError, StorageErrorKind};
///
/// fn write() -> VitrineResult<()> {
///     Err(StorageError::new(StorageErrorKind::Unavailable("disabled".into())))?
/// }
///
/// match write() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vitrine Error: {}", _0)]
pub struct VitrineError(Box<VitrineErrorKind>);

impl VitrineError {
    /// Create a new error from a kind.
    pub fn new(kind: VitrineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VitrineErrorKind {
        &self.0
    }
}

impl<T> From<T> for VitrineError
where
    T: Into<VitrineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vitrine operations.
pub type VitrineResult<T> = std::result::Result<T, VitrineError>;
