//! Errors from loading or validating resolver settings.

/// A settings file, environment override or value check was rejected.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What was rejected and why
    pub message: String,
    /// Source line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl ConfigError {
    /// Reject configuration with `message`, tagged with the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrine_error::ConfigError;
    ///
    /// let err = ConfigError::new("proxy_prefix must start with '/'");
    /// assert!(err.message.contains("proxy_prefix"));
    /// assert!(err.to_string().starts_with("Configuration Error"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
