//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an entry
    #[display("Failed to write entry: {}", _0)]
    FileWrite(String),
    /// Failed to read an entry
    #[display("Failed to read entry: {}", _0)]
    FileRead(String),
    /// Key contains characters the backend cannot store
    #[display("Invalid storage key: {}", _0)]
    InvalidKey(String),
    /// Write would exceed the backend's quota
    #[display("Storage quota exceeded: {}", _0)]
    QuotaExceeded(String),
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use vitrine_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::QuotaExceeded("failedNewsImages".to_string()));
/// assert!(format!("{}", err).contains("quota exceeded"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
