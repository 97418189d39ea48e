//! Upstream text-generation error types and retry classification.

/// Upstream generation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Provider rejected the request due to rate limiting
    #[display("Rate limited by provider: {}", _0)]
    RateLimited(String),
    /// Request or caller deadline timed out
    #[display("Generation timed out: {}", _0)]
    Timeout(String),
    /// Provider returned an error that is not retryable
    #[display("Upstream provider error: {}", _0)]
    Upstream(String),
    /// Provider returned an empty completion
    #[display("Provider returned an empty response")]
    EmptyResponse,
    /// Structured output could not be parsed from the response text
    #[display("Failed to parse structured response: {}", _0)]
    ResponseParse(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Rate limits and timeouts are transient; everything else surfaces
    /// immediately to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::RateLimited(_) | GenerationErrorKind::Timeout(_)
        )
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use quillforge_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::RateLimited("429".into()));
/// assert!(err.is_retryable());
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyResponse);
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient conditions like rate limits or network timeouts return true;
/// permanent failures like malformed input or authentication errors return
/// false and must surface immediately.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
