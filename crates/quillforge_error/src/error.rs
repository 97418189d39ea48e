//! Top-level error wrapper types.

use crate::{
    ConfigError, ConsistencyError, GenerationError, JsonError, LimitExceededError, NotFoundError,
    ValidationError,
};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// This is the foundation error enum shared by every Quillforge crate.
///
/// # Examples
///
/// ```
/// use quillforge_error::{QuillforgeError, ValidationError};
///
/// let val_err = ValidationError::new("empty body");
/// let err: QuillforgeError = val_err.into();
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuillforgeErrorKind {
    /// Malformed caller input, never retried
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Upstream text-generation failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Usage gate or edit-count cap tripped
    #[from(LimitExceededError)]
    LimitExceeded(LimitExceededError),
    /// Missing lineage or revision
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Storage returned an inconsistent lineage
    #[from(ConsistencyError)]
    Consistency(ConsistencyError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Quillforge error with kind discrimination.
///
/// # Examples
///
/// ```
/// use quillforge_error::{QuillforgeResult, NotFoundError};
///
/// fn might_fail() -> QuillforgeResult<()> {
///     Err(NotFoundError::new("missing lineage"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Quillforge Error: {}", _0)]
pub struct QuillforgeError(Box<QuillforgeErrorKind>);

impl QuillforgeError {
    /// Create a new error from a kind.
    pub fn new(kind: QuillforgeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuillforgeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to QuillforgeErrorKind
impl<T> From<T> for QuillforgeError
where
    T: Into<QuillforgeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quillforge operations.
///
/// # Examples
///
/// ```
/// use quillforge_error::{QuillforgeResult, ValidationError};
///
/// fn parse_request() -> QuillforgeResult<String> {
///     Err(ValidationError::new("missing title"))?
/// }
/// ```
pub type QuillforgeResult<T> = std::result::Result<T, QuillforgeError>;
