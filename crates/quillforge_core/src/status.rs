//! Status and category enums shared across the engine.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a content revision or edit record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentStatus {
    /// Created but the upstream call has not finished
    Pending,
    /// Upstream call succeeded and the revision is persisted
    Completed,
    /// Upstream call failed; kept as an audit row when requested
    Failed,
    /// Abandoned by the caller
    Cancelled,
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Completed
    }
}

/// Which engine surface consumed the tokens.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceCategory {
    /// Fresh lineage generation
    ContentGeneration,
    /// Edit applied to an existing lineage
    ContentEditing,
    /// Style-profile analysis (metered here, produced elsewhere)
    StyleAnalysis,
}

/// The operation performed within a service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationCategory {
    /// Generate a new revision from a brief
    Generate,
    /// Rewrite an existing revision
    Edit,
    /// Analyze reference material
    Analyze,
}

/// Outcome recorded on a usage entry.
///
/// `Partial` marks tokens that were genuinely spent upstream even though a
/// later persistence step failed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuccessFlag {
    /// Operation completed end to end
    Success,
    /// Upstream call succeeded but a downstream step failed
    Partial,
    /// Operation failed
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn snake_case_round_trips() {
        assert_eq!(ServiceCategory::ContentGeneration.to_string(), "content_generation");
        assert_eq!(
            ServiceCategory::from_str("content_editing").ok(),
            Some(ServiceCategory::ContentEditing)
        );
        assert_eq!(ContentStatus::Completed.to_string(), "completed");
        assert_eq!(SuccessFlag::Partial.to_string(), "partial");
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert!(ContentStatus::from_str("archived").is_err());
        assert!(SuccessFlag::from_str("maybe").is_err());
    }
}
