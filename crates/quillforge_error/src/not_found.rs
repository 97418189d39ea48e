//! Missing-resource error types.

/// A lineage, revision, or edit record does not exist.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", message, line, file)]
pub struct NotFoundError {
    /// Description of the missing resource
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use quillforge_error::NotFoundError;
    ///
    /// let err = NotFoundError::new("lineage 42 does not exist");
    /// assert!(err.message.contains("lineage"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
