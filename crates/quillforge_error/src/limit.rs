//! Usage-limit error types.

/// Kinds of exceeded limits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LimitExceededErrorKind {
    /// Daily token allowance for the organization is exhausted
    #[display("Daily usage limit exceeded: {} of {} tokens used", used, limit)]
    DailyTokens {
        /// Tokens consumed so far today
        used: i64,
        /// Daily token allowance for the plan
        limit: i64,
    },
    /// Monthly token allowance for the organization is exhausted
    #[display("Monthly usage limit exceeded: {} of {} tokens used", used, limit)]
    MonthlyTokens {
        /// Tokens consumed so far this month
        used: i64,
        /// Monthly token allowance for the plan
        limit: i64,
    },
    /// The lineage already holds the maximum number of edit records
    #[display("Maximum edit limit ({}) reached for this content", _0)]
    EditCount(u32),
}

/// Limit-exceeded error with source location tracking.
///
/// These are user-actionable conditions (upgrade the plan, wait for the
/// window to reset), not bugs, and must surface as a distinct signal.
///
/// # Examples
///
/// ```
/// use quillforge_error::{LimitExceededError, LimitExceededErrorKind};
///
/// let err = LimitExceededError::new(LimitExceededErrorKind::EditCount(50));
/// assert!(format!("{}", err).contains("edit limit"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Limit Exceeded: {} at line {} in {}", kind, line, file)]
pub struct LimitExceededError {
    /// The kind of error that occurred
    pub kind: LimitExceededErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LimitExceededError {
    /// Create a new LimitExceededError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LimitExceededErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
