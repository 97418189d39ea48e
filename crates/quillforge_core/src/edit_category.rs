//! Edit request categories and their prompt guidance.

use serde::{Deserialize, Serialize};

/// What kind of change an edit request asks for.
///
/// The category steers the rewrite prompt; it does not constrain what the
/// upstream model actually returns.
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
pub enum EditCategory {
    /// Unscoped change
    General,
    /// Writing style and voice
    Style,
    /// Formality or mood
    Tone,
    /// Expand or condense
    Length,
    /// Reorganize flow
    Structure,
    /// Grammar, spelling, punctuation
    Grammar,
    /// Readability without changing the message
    Clarity,
}

impl Default for EditCategory {
    fn default() -> Self {
        Self::General
    }
}

impl EditCategory {
    /// Prompt guidance sentence for this category.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Style => {
                "Focus on adjusting the writing style, tone, and voice while maintaining the core content."
            }
            Self::Tone => {
                "Adjust the tone of the content (formal/informal, serious/light, etc.) while keeping the message intact."
            }
            Self::Length => {
                "Modify the length of the content (expand or condense) while preserving key information."
            }
            Self::Structure => {
                "Reorganize the structure and flow of the content for better readability."
            }
            Self::Grammar => {
                "Fix grammar, spelling, and punctuation errors while maintaining the original meaning."
            }
            Self::Clarity => {
                "Improve clarity and readability without changing the core message."
            }
            Self::General => {
                "Make the requested changes while maintaining content quality and coherence."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_snake_case_tags() {
        assert_eq!(EditCategory::from_str("grammar").ok(), Some(EditCategory::Grammar));
        assert!(EditCategory::from_str("rewrite").is_err());
    }

    #[test]
    fn every_category_has_guidance() {
        for cat in [
            EditCategory::General,
            EditCategory::Style,
            EditCategory::Tone,
            EditCategory::Length,
            EditCategory::Structure,
            EditCategory::Grammar,
            EditCategory::Clarity,
        ] {
            assert!(!cat.guidance().is_empty());
        }
    }
}
