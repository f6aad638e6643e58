//! Errors raised while assembling values through builders.

/// What went wrong in a builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A field without default was never set
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// The assembled value breaks an invariant
    #[display("Validation failed: {}", _0)]
    ValidationFailed(String),
}

/// Builder failure tagged with the call site that built it.
///
/// # Examples
///
/// ```
/// use vitrine_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::new(BuilderErrorKind::ValidationFailed("ttl_seconds is 0".into()));
/// assert_eq!(
///     err.kind(),
///     &BuilderErrorKind::ValidationFailed("ttl_seconds is 0".into())
/// );
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The failure condition.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}
