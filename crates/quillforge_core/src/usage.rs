//! Token accounting for one upstream call.

use serde::{Deserialize, Serialize};

/// Tokens consumed by a single upstream generation call.
///
/// # Examples
///
/// ```
/// use quillforge_core::TokenUsage;
///
/// let usage = TokenUsage::new(120, 480);
/// assert_eq!(usage.total_tokens, 600);
/// assert!(usage.is_consistent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt-side tokens
    pub input_tokens: i64,
    /// Completion-side tokens
    pub output_tokens: i64,
    /// Sum of input and output tokens
    pub total_tokens: i64,
}

impl TokenUsage {
    /// Build a usage record with the total derived from its parts.
    pub fn new(input_tokens: i64, output_tokens: i64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// True when the total equals the sum of the parts and nothing is negative.
    pub fn is_consistent(&self) -> bool {
        self.input_tokens >= 0
            && self.output_tokens >= 0
            && self.total_tokens == self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_total() {
        let usage = TokenUsage::new(10, 25);
        assert_eq!(usage.total_tokens, 35);
        assert!(usage.is_consistent());
    }

    #[test]
    fn mismatched_total_is_inconsistent() {
        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 25,
            total_tokens: 40,
        };
        assert!(!usage.is_consistent());
    }

    #[test]
    fn negative_counts_are_inconsistent() {
        let usage = TokenUsage {
            input_tokens: -1,
            output_tokens: 1,
            total_tokens: 0,
        };
        assert!(!usage.is_consistent());
    }
}
