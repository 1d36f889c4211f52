//! Pulling a JSON document out of model output.
//!
//! Strict schema mode normally returns bare JSON, but compatible servers
//! sometimes wrap it in a markdown fence or surround it with prose.

use serde_json::Value as JsonValue;

/// Parse a JSON object from model output.
///
/// Strategies, in order:
/// 1. The whole text as JSON
/// 2. A fenced ```json block
/// 3. The first balanced `{ ... }`
///
/// Returns a description of the failure when none yields valid JSON.
///
/// # Examples
///
/// ```
/// use manimate_models::extract_json;
///
/// let response = "Here it is:\n```json\n{\"scene_name\": \"Intro\"}\n```\n";
/// let value = extract_json(response).unwrap();
/// assert_eq!(value["scene_name"], "Intro");
/// ```
pub fn extract_json(response: &str) -> Result<JsonValue, String> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let fenced = extract_from_code_block(trimmed, "json")
        .and_then(|block| serde_json::from_str(&block).ok());
    if let Some(value) = fenced {
        return Ok(value);
    }

    if let Some(object) = extract_balanced(trimmed, '{', '}') {
        return serde_json::from_str(&object).map_err(|e| e.to_string());
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in LLM response"
    );
    Err(format!(
        "no JSON object found in response (length: {})",
        response.len()
    ))
}

/// Content of the first ```language fence; an unterminated fence runs to
/// the end of the text.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);
    let start = response.find(&pattern)?;
    let content_start = start + pattern.len();
    let rest = &response[content_start..];
    let content = match rest.find("\n```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(content.trim().to_string())
}

/// Text between the first `open` and its matching `close`, skipping
/// delimiters inside string literals.
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
