//! Storage consistency fault types.

/// Consistency fault conditions.
///
/// These indicate a prior transactional bug in the store, not a normal miss.
/// Callers must log them loudly and never silently repair the lineage by
/// guessing which revision is "really" current.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConsistencyErrorKind {
    /// A known lineage has no revision flagged current
    #[display("Lineage {} has no current revision", _0)]
    NoCurrentRevision(String),
    /// A lineage has more than one revision flagged current
    #[display("Lineage {} has {} current revisions", lineage, count)]
    MultipleCurrentRevisions {
        /// The affected lineage id
        lineage: String,
        /// Number of rows flagged current
        count: usize,
    },
    /// A concurrent edit won the race for the current pointer
    #[display("Revision is no longer current: {}", _0)]
    StaleRevision(String),
}

/// Consistency error with source location tracking.
///
/// # Examples
///
/// ```
/// use quillforge_error::{ConsistencyError, ConsistencyErrorKind};
///
/// let err = ConsistencyError::new(ConsistencyErrorKind::NoCurrentRevision("abc".into()));
/// assert!(format!("{}", err).contains("no current revision"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Consistency Error: {} at line {} in {}", kind, line, file)]
pub struct ConsistencyError {
    /// The kind of error that occurred
    pub kind: ConsistencyErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConsistencyError {
    /// Create a new ConsistencyError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConsistencyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
