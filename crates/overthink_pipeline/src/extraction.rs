//! Pulling structured JSON out of model replies.
//!
//! Replies often wrap JSON in markdown fences or surround it with chatter.
//! Extraction tries, in order:
//! 1. Markdown code blocks (```json ... ``` or bare ```)
//! 2. The first balanced `{ ... }` object
//! 3. The first balanced `[ ... ]` array

use overthink_error::{FlowError, Stage};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Extract the JSON text from a reply that may contain markdown or extra text.
///
/// # Examples
///
/// ```
/// use overthink_pipeline::extract_json;
///
/// let reply = "Sure! Here you go:\n```json\n{\"scenario1\": \"a\", \"scenario2\": \"b\"}\n```";
/// assert_eq!(
///     extract_json(reply).as_deref(),
///     Some("{\"scenario1\": \"a\", \"scenario2\": \"b\"}")
/// );
///
/// assert!(extract_json("no structure here").is_none());
/// ```
pub fn extract_json(response: &str) -> Option<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Some(json);
    }

    extract_balanced(response, '{', '}').or_else(|| extract_balanced(response, '[', ']'))
}

/// Extract and deserialize a reply, failing with a generation error for `stage`.
pub fn parse_json<T: DeserializeOwned>(stage: Stage, response: &str) -> Result<T, FlowError> {
    let json = extract_json(response).ok_or_else(|| {
        warn!(%stage, response_length = response.len(), "No JSON found in model reply");
        FlowError::generation(stage, "model reply contained no JSON")
    })?;

    serde_json::from_str(&json).map_err(|e| {
        warn!(%stage, error = %e, "Model reply JSON did not match the expected shape");
        FlowError::generation(stage, format!("unexpected reply shape: {}", e))
    })
}

/// Content of the first markdown code block, with or without a language tag.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let after_fence = start + 3;
    // Skip the language tag line, if any
    let content_start = response[after_fence..]
        .find('\n')
        .map(|n| after_fence + n + 1)
        .unwrap_or(after_fence);

    let content = match response[content_start..].find("```") {
        Some(end) => &response[content_start..content_start + end],
        // Unterminated fence, likely a truncated reply
        None => &response[content_start..],
    };

    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}

/// Content between the first `open` and its matching `close`, honouring strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
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
    use overthink_core::ScenarioPair;

    #[test]
    fn bare_object_with_chatter() {
        let reply = "Okay! {\"scenario1\": \"a {nested} brace\", \"scenario2\": \"b\"} Hope that helps.";
        let pair: ScenarioPair = parse_json(Stage::Scenarios, reply).unwrap();
        assert_eq!(pair.scenario1, "a {nested} brace");
    }

    #[test]
    fn unterminated_fence_is_tolerated() {
        let reply = "```json\n{\"scenario1\": \"a\", \"scenario2\": \"b\"}";
        let pair: ScenarioPair = parse_json(Stage::Scenarios, reply).unwrap();
        assert_eq!(pair.scenario2, "b");
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let reply = r#"{"scenario1": "she said \"}\"", "scenario2": "b"}"#;
        let pair: ScenarioPair = parse_json(Stage::Scenarios, reply).unwrap();
        assert_eq!(pair.scenario1, "she said \"}\"");
    }

    #[test]
    fn wrong_shape_is_generation_error() {
        let err = parse_json::<ScenarioPair>(Stage::Scenarios, "{\"scenario1\": \"a\"}").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Scenarios));
        assert!(err.user_message().contains("unexpected reply shape"));
    }

    #[test]
    fn missing_json_is_generation_error() {
        let err = parse_json::<ScenarioPair>(Stage::Analysis, "I'd rather not.").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Analysis));
    }
}
