//! Errors from reading or writing JSON input and output.

/// A reference or record could not be parsed, or output could not be encoded.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// Parser or encoder message
    pub message: String,
    /// Source line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl JsonError {
    /// Report a JSON failure, tagged with the caller's location.
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

#[cfg(feature = "json")]
impl From<serde_json::Error> for JsonError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn converts_parser_errors() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = JsonError::from(parse_err);
        assert!(err.message.contains("EOF"));
        assert!(err.file.ends_with("json.rs"));
    }
}
