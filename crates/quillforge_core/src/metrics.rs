//! Content metrics computed from raw text.

use serde::{Deserialize, Serialize};

/// Words per minute assumed when estimating reading time.
const READING_WORDS_PER_MINUTE: usize = 200;

/// Aggregate text metrics for one revision body.
///
/// # Examples
///
/// ```
/// use quillforge_core::content_metrics;
///
/// let m = content_metrics("Hello world. Another sentence!");
/// assert_eq!(m.word_count, 4);
/// assert_eq!(m.sentence_count, 2);
/// assert_eq!(m.reading_time_minutes, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentMetrics {
    /// Whitespace-delimited token count
    pub word_count: usize,
    /// Total character count
    pub character_count: usize,
    /// Character count excluding spaces
    pub character_count_no_spaces: usize,
    /// Non-empty segments split on `.`/`!`/`?` runs
    pub sentence_count: usize,
    /// Non-empty blocks split on blank lines
    pub paragraph_count: usize,
    /// Mean words per sentence
    pub average_words_per_sentence: f64,
    /// Mean characters per word
    pub average_characters_per_word: f64,
    /// Estimated reading time, never less than one minute for non-empty text
    pub reading_time_minutes: usize,
}

/// Compute comprehensive metrics for a piece of text.
///
/// Empty or whitespace-only input yields all-zero metrics rather than an
/// error. Word splitting is plain whitespace tokenization so the result is
/// identical regardless of locale.
pub fn content_metrics(text: &str) -> ContentMetrics {
    if text.trim().is_empty() {
        return ContentMetrics::default();
    }

    let word_count = text.split_whitespace().count();
    let character_count = text.chars().count();
    let character_count_no_spaces = text.chars().filter(|c| *c != ' ').count();

    let sentence_count = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();

    let paragraph_count = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    let average_words_per_sentence = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };
    let average_characters_per_word = if word_count > 0 {
        character_count as f64 / word_count as f64
    } else {
        0.0
    };

    let reading_time_minutes = (word_count / READING_WORDS_PER_MINUTE).max(1);

    ContentMetrics {
        word_count,
        character_count,
        character_count_no_spaces,
        sentence_count,
        paragraph_count,
        average_words_per_sentence,
        average_characters_per_word,
        reading_time_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_metrics() {
        assert_eq!(content_metrics(""), ContentMetrics::default());
        assert_eq!(content_metrics("   \n\t  "), ContentMetrics::default());
    }

    #[test]
    fn nonempty_text_has_at_least_one_word() {
        let m = content_metrics("x");
        assert_eq!(m.word_count, 1);
        assert_eq!(m.reading_time_minutes, 1);
    }

    #[test]
    fn counts_words_sentences_paragraphs() {
        let text = "One two three. Four five!\n\nSix seven? Eight.";
        let m = content_metrics(text);
        assert_eq!(m.word_count, 8);
        assert_eq!(m.sentence_count, 4);
        assert_eq!(m.paragraph_count, 2);
        assert_eq!(m.average_words_per_sentence, 2.0);
    }

    #[test]
    fn sentence_splitting_ignores_punctuation_runs() {
        let m = content_metrics("Wait... what?! Really.");
        assert_eq!(m.sentence_count, 3);
    }

    #[test]
    fn reading_time_scales_with_word_count() {
        let long_text = "word ".repeat(650);
        let m = content_metrics(&long_text);
        assert_eq!(m.word_count, 650);
        assert_eq!(m.reading_time_minutes, 3);
    }

    #[test]
    fn char_count_excludes_spaces_in_no_spaces_field() {
        let m = content_metrics("a b c");
        assert_eq!(m.character_count, 5);
        assert_eq!(m.character_count_no_spaces, 3);
    }
}
