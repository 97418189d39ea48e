//! Structured diff between two text revisions.

use crate::content_metrics;
use serde::{Deserialize, Serialize};

/// Classification of the change between two revisions.
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
pub enum ChangeType {
    /// Both texts are identical (or both empty)
    None,
    /// Old text was empty, new text is not
    Addition,
    /// New text is empty, old text was not
    Deletion,
    /// Word count grew
    Expansion,
    /// Word count shrank
    Contraction,
    /// Text changed but word count is unchanged
    Modification,
}

/// Structured diff between an old and a new revision body.
///
/// `lines` is a line-oriented, context-free diff: every line of both texts
/// appears exactly once, prefixed `+ `, `- `, or two spaces for unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDiff {
    /// Whether the texts differ at all
    pub has_changes: bool,
    /// Classification of the change
    pub change_type: ChangeType,
    /// `new_word_count - old_word_count`
    pub word_count_delta: i64,
    /// `new_character_count - old_character_count`
    pub character_count_delta: i64,
    /// Tagged diff lines
    pub lines: Vec<String>,
    /// One-sentence natural-language description of the change
    pub summary: String,
}

/// Compute a structured diff between two texts.
///
/// Pure and deterministic: identical inputs always yield identical output.
///
/// # Examples
///
/// ```
/// use quillforge_core::{text_diff, ChangeType};
///
/// let diff = text_diff("one two three", "one two");
/// assert_eq!(diff.change_type, ChangeType::Contraction);
/// assert_eq!(diff.word_count_delta, -1);
///
/// let noop = text_diff("same", "same");
/// assert!(!noop.has_changes);
/// assert_eq!(noop.change_type, ChangeType::None);
/// ```
pub fn text_diff(old_text: &str, new_text: &str) -> TextDiff {
    if old_text == new_text {
        return TextDiff {
            has_changes: false,
            change_type: ChangeType::None,
            word_count_delta: 0,
            character_count_delta: 0,
            lines: Vec::new(),
            summary: "No changes".to_string(),
        };
    }

    let old_words = content_metrics(old_text).word_count as i64;
    let new_words = content_metrics(new_text).word_count as i64;
    let word_count_delta = new_words - old_words;
    let character_count_delta =
        new_text.chars().count() as i64 - old_text.chars().count() as i64;

    if old_text.is_empty() {
        return TextDiff {
            has_changes: true,
            change_type: ChangeType::Addition,
            word_count_delta,
            character_count_delta,
            lines: new_text.lines().map(|l| format!("+ {l}")).collect(),
            summary: format!("Added {new_words} words"),
        };
    }

    if new_text.is_empty() {
        return TextDiff {
            has_changes: true,
            change_type: ChangeType::Deletion,
            word_count_delta,
            character_count_delta,
            lines: old_text.lines().map(|l| format!("- {l}")).collect(),
            summary: format!("Removed {old_words} words"),
        };
    }

    let change_type = match word_count_delta {
        d if d > 0 => ChangeType::Expansion,
        d if d < 0 => ChangeType::Contraction,
        _ => ChangeType::Modification,
    };

    let summary = if word_count_delta != 0 {
        format!("Content {change_type} by {} words", word_count_delta.abs())
    } else {
        "Content modified with same word count".to_string()
    };

    TextDiff {
        has_changes: true,
        change_type,
        word_count_delta,
        character_count_delta,
        lines: diff_lines(old_text, new_text),
        summary,
    }
}

/// Line-oriented diff via longest common subsequence.
///
/// Quadratic in line count, which is fine for revision bodies (documents,
/// not codebases).
fn diff_lines(old_text: &str, new_text: &str) -> Vec<String> {
    let old: Vec<&str> = old_text.lines().collect();
    let new: Vec<&str> = new_text.lines().collect();

    // lcs[i][j] = length of LCS of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(old.len() + new.len());
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            lines.push(format!("  {}", old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(format!("- {}", old[i]));
            i += 1;
        } else {
            lines.push(format!("+ {}", new[j]));
            j += 1;
        }
    }
    for line in &old[i..] {
        lines.push(format!("- {line}"));
    }
    for line in &new[j..] {
        lines.push(format!("+ {line}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_report_no_changes() {
        for text in ["", "hello", "multi\nline\ntext"] {
            let diff = text_diff(text, text);
            assert!(!diff.has_changes);
            assert_eq!(diff.change_type, ChangeType::None);
            assert_eq!(diff.word_count_delta, 0);
            assert_eq!(diff.character_count_delta, 0);
        }
    }

    #[test]
    fn addition_from_empty() {
        let diff = text_diff("", "one two three");
        assert_eq!(diff.change_type, ChangeType::Addition);
        assert_eq!(diff.word_count_delta, 3);
        assert_eq!(diff.lines, vec!["+ one two three"]);
        assert_eq!(diff.summary, "Added 3 words");
    }

    #[test]
    fn deletion_to_empty() {
        let diff = text_diff("one two", "");
        assert_eq!(diff.change_type, ChangeType::Deletion);
        assert_eq!(diff.word_count_delta, -2);
        assert_eq!(diff.summary, "Removed 2 words");
    }

    #[test]
    fn expansion_and_contraction_by_word_delta_sign() {
        let grow = text_diff("a b", "a b c d");
        assert_eq!(grow.change_type, ChangeType::Expansion);
        assert_eq!(grow.summary, "Content expansion by 2 words");

        let shrink = text_diff("a b c d", "a b");
        assert_eq!(shrink.change_type, ChangeType::Contraction);
        assert_eq!(shrink.summary, "Content contraction by 2 words");
    }

    #[test]
    fn same_word_count_is_modification() {
        let diff = text_diff("alpha beta", "gamma delta");
        assert_eq!(diff.change_type, ChangeType::Modification);
        assert_eq!(diff.word_count_delta, 0);
        assert_eq!(diff.summary, "Content modified with same word count");
    }

    #[test]
    fn word_delta_matches_metrics_difference() {
        let pairs = [
            ("", "one two"),
            ("short text here", ""),
            ("a b c", "a b c d e"),
            ("line one\nline two", "line one\nchanged"),
        ];
        for (a, b) in pairs {
            let diff = text_diff(a, b);
            let expected =
                content_metrics(b).word_count as i64 - content_metrics(a).word_count as i64;
            assert_eq!(diff.word_count_delta, expected, "pair ({a:?}, {b:?})");
        }
    }

    #[test]
    fn diff_lines_tag_every_line() {
        let diff = text_diff("keep\nold line\nkeep2", "keep\nnew line\nkeep2");
        assert_eq!(
            diff.lines,
            vec!["  keep", "- old line", "+ new line", "  keep2"]
        );
    }
}
