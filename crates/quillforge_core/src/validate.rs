//! Input validators applied before any tokens are spent.

use quillforge_error::{QuillforgeResult, ValidationError};
use std::collections::HashMap;

/// Minimum title length in characters.
pub const MIN_TITLE_CHARS: usize = 3;
/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 500;
/// Minimum length of a non-empty brief in characters.
pub const MIN_BRIEF_CHARS: usize = 10;
/// Maximum brief length in characters.
pub const MAX_BRIEF_CHARS: usize = 5_000;
/// Maximum edit-instruction length in characters.
pub const MAX_INSTRUCTION_CHARS: usize = 2_000;
/// Minimum body length in characters.
pub const MIN_BODY_CHARS: usize = 100;
/// Maximum body length in characters.
pub const MAX_BODY_CHARS: usize = 50_000;
/// Minimum body length in words.
pub const MIN_BODY_WORDS: usize = 10;

/// Validate and normalize a content title.
///
/// Trims surrounding whitespace; rejects empty, too-short, or over-long
/// titles.
///
/// # Examples
///
/// ```
/// use quillforge_core::validate_title;
///
/// assert_eq!(validate_title("  A Title  ").ok().as_deref(), Some("A Title"));
/// assert!(validate_title("   ").is_err());
/// assert!(validate_title("ab").is_err());
/// ```
pub fn validate_title(title: &str) -> QuillforgeResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("title cannot be empty"))?;
    }
    let chars = trimmed.chars().count();
    if chars < MIN_TITLE_CHARS {
        return Err(ValidationError::new(format!(
            "title must be at least {MIN_TITLE_CHARS} characters"
        )))?;
    }
    if chars > MAX_TITLE_CHARS {
        return Err(ValidationError::new(format!(
            "title exceeds {MAX_TITLE_CHARS} characters"
        )))?;
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an optional brief/outline.
///
/// A missing or empty brief is fine; one that carries text must run at
/// least ten characters.
pub fn validate_brief(brief: Option<&str>) -> QuillforgeResult<Option<String>> {
    match brief {
        None => Ok(None),
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let chars = trimmed.chars().count();
            if chars < MIN_BRIEF_CHARS {
                return Err(ValidationError::new(format!(
                    "brief must be at least {MIN_BRIEF_CHARS} characters"
                )))?;
            }
            if chars > MAX_BRIEF_CHARS {
                return Err(ValidationError::new(format!(
                    "brief exceeds {MAX_BRIEF_CHARS} characters"
                )))?;
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Validate and normalize an edit instruction.
pub fn validate_instruction(instruction: &str) -> QuillforgeResult<String> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("edit instruction cannot be empty"))?;
    }
    if trimmed.chars().count() > MAX_INSTRUCTION_CHARS {
        return Err(ValidationError::new(format!(
            "edit instruction exceeds {MAX_INSTRUCTION_CHARS} characters"
        )))?;
    }
    Ok(trimmed.to_string())
}

/// Validate a content body for length and quality.
///
/// Bodies must run at least 100 characters and 10 words. A single word
/// making up more than 30% of the text reads as spam and is rejected.
///
/// # Examples
///
/// ```
/// use quillforge_core::validate_body;
///
/// assert!(validate_body(&"buy ".repeat(500)).is_err());
/// ```
pub fn validate_body(body: &str) -> QuillforgeResult<()> {
    if body.trim().is_empty() {
        return Err(ValidationError::new("content body cannot be empty"))?;
    }
    let chars = body.chars().count();
    if chars < MIN_BODY_CHARS {
        return Err(ValidationError::new(format!(
            "content must be at least {MIN_BODY_CHARS} characters"
        )))?;
    }
    if chars > MAX_BODY_CHARS {
        return Err(ValidationError::new(format!(
            "content exceeds {MAX_BODY_CHARS} characters"
        )))?;
    }

    let words: Vec<String> = body.split_whitespace().map(str::to_lowercase).collect();
    if words.len() < MIN_BODY_WORDS {
        return Err(ValidationError::new(format!(
            "content must have at least {MIN_BODY_WORDS} words"
        )))?;
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in &words {
        *frequency.entry(word.as_str()).or_default() += 1;
    }
    if let Some(&max) = frequency.values().max()
        && max * 10 > words.len() * 3
    {
        return Err(ValidationError::new(
            "content appears to have excessive word repetition",
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(validate_title(" hello ").ok().as_deref(), Some("hello"));
        assert!(validate_title("").is_err());
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"x".repeat(501)).is_err());
        assert!(validate_title(&"x".repeat(500)).is_ok());
    }

    #[test]
    fn empty_brief_collapses_to_none() {
        assert_eq!(validate_brief(None).ok(), Some(None));
        assert_eq!(validate_brief(Some("   ")).ok(), Some(None));
        assert_eq!(
            validate_brief(Some(" a short outline ")).ok(),
            Some(Some("a short outline".to_string()))
        );
        assert!(validate_brief(Some(&"y".repeat(5_001))).is_err());
    }

    #[test]
    fn brief_with_text_needs_ten_characters() {
        assert!(validate_brief(Some("too short")).is_err());
        assert!(validate_brief(Some("just long enough")).is_ok());
    }

    #[test]
    fn instruction_must_be_nonempty() {
        assert!(validate_instruction("  ").is_err());
        assert!(validate_instruction(&"z".repeat(2_001)).is_err());
        assert_eq!(
            validate_instruction("make it shorter").ok().as_deref(),
            Some("make it shorter")
        );
    }

    #[test]
    fn body_needs_length_and_word_count() {
        assert!(validate_body("").is_err());
        assert!(validate_body("Too short to count as real content.").is_err());
        // Long enough in characters but only one word.
        assert!(validate_body(&"x".repeat(150)).is_err());
        assert!(validate_body(&"word ".repeat(10_001)).is_err());

        let body = "A reasonably long paragraph about nothing in particular, \
                    written out far enough to pass both the size check and \
                    the word variety check with room to spare.";
        assert!(validate_body(body).is_ok());
    }

    #[test]
    fn repetitive_bodies_are_rejected() {
        // One word dominating the text past the 30% mark.
        let spam = format!("order today and {}", "buy ".repeat(40));
        assert!(validate_body(&spam).is_err());

        // The same word at 30% exactly still passes.
        let borderline = "echo echo echo echo echo echo one two three four \
                          five six seven eight nine ten eleven twelve \
                          thirteen fourteen";
        assert!(validate_body(borderline).is_ok());
    }
}
