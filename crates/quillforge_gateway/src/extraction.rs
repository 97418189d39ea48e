//! Extracting structured data from upstream responses.
//!
//! Providers often wrap JSON in markdown code fences or surround it with
//! prose. These helpers pull the payload out before parsing; a payload that
//! still fails to parse is a [`GenerationErrorKind::ResponseParse`] fault,
//! distinct from transport or rate-limit errors.

use quillforge_error::{GenerationError, GenerationErrorKind, QuillforgeResult};

/// Extract a JSON payload from a response that may contain markdown or
/// extra text.
///
/// Tries, in order: a fenced ```json block, any fenced block, then the
/// first balanced `{...}` or `[...]` region.
///
/// # Errors
///
/// Returns a `ResponseParse` error when no JSON-shaped region exists.
///
/// # Examples
///
/// ```
/// use quillforge_gateway::extract_json;
///
/// let response = "Here you go:\n```json\n{\"ok\": true}\n```";
/// assert_eq!(extract_json(response).ok().as_deref(), Some("{\"ok\": true}"));
/// ```
pub fn extract_json(response: &str) -> QuillforgeResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let brace = response.find('{');
    let bracket = response.find('[');
    let object_first = match (brace, bracket) {
        (Some(b), Some(k)) => b < k,
        (Some(_), None) => true,
        _ => false,
    };

    let candidates: [(char, char); 2] = if object_first {
        [('{', '}'), ('[', ']')]
    } else {
        [('[', ']'), ('{', '}')]
    };
    for (open, close) in candidates {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::warn!(response_length = response.len(), "no JSON found in response");
    Err(GenerationError::new(GenerationErrorKind::ResponseParse(
        format!("no JSON found in response of {} characters", response.len()),
    )))?
}

/// Extract and deserialize a JSON payload in one step.
///
/// # Errors
///
/// `ResponseParse` when no payload is found or it does not deserialize
/// into `T`.
pub fn parse_json<T>(response: &str) -> QuillforgeResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let payload = extract_json(response)?;
    serde_json::from_str(&payload).map_err(|e| {
        GenerationError::new(GenerationErrorKind::ResponseParse(e.to_string())).into()
    })
}

/// Pull the contents of a markdown code fence, tolerating a missing
/// closing fence (truncated responses).
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{language}");
    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        return match response[content_start..].find("```") {
            Some(end) => Some(response[content_start..content_start + end].trim().to_string()),
            None => Some(response[content_start..].trim().to_string()),
        };
    }

    let start = response.find("```")?;
    let content_start = start + 3;
    // skip a possible language tag on the fence line
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);
    match response[skip_to..].find("```") {
        Some(end) => Some(response[skip_to..skip_to + end].trim().to_string()),
        None => Some(response[skip_to..].trim().to_string()),
    }
}

/// Extract the first balanced `open`..`close` region, respecting string
/// literals and escapes.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_preferred() {
        let response = "Sure!\n```json\n{\"a\": 1}\n```\nAnything else?";
        assert_eq!(extract_json(response).ok().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn bare_object_is_found_amid_prose() {
        let response = "The result is {\"a\": {\"b\": 2}} as requested.";
        assert_eq!(
            extract_json(response).ok().as_deref(),
            Some("{\"a\": {\"b\": 2}}")
        );
    }

    #[test]
    fn array_before_object_wins() {
        let response = "[1, 2, 3] then {\"a\": 1}";
        assert_eq!(extract_json(response).ok().as_deref(), Some("[1, 2, 3]"));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scanner() {
        let response = r#"{"text": "closing } inside a string"}"#;
        assert_eq!(extract_json(response).ok().as_deref(), Some(response));
    }

    #[test]
    fn missing_json_is_a_parse_error() {
        assert!(extract_json("no structured data here").is_err());
    }

    #[test]
    fn parse_json_deserializes_typed_payloads() {
        #[derive(serde::Deserialize)]
        struct Payload {
            count: i64,
        }
        let payload: Payload = parse_json("```json\n{\"count\": 7}\n```").expect("parses");
        assert_eq!(payload.count, 7);
    }

    #[test]
    fn truncated_fence_still_extracts() {
        let response = "```json\n{\"a\": 1}";
        assert_eq!(extract_json(response).ok().as_deref(), Some("{\"a\": 1}"));
    }
}
