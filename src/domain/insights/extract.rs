//! Recovery of a JSON object from free-form generated text.

use serde_json::Value;

use super::InsightError;

/// Extracts the structured payload from raw generator output.
///
/// Output that is valid JSON as a whole is taken as is. Otherwise the first
/// balanced `{...}` region that parses is returned; braces inside string
/// literals are ignored while balancing.
pub fn extract_json(raw: &str) -> Result<Value, InsightError> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    for (start, _) in trimmed.match_indices('{') {
        let Some(end) = balanced_end(trimmed, start) else {
            continue;
        };
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&trimmed[start..end]) {
            return Ok(value);
        }
    }

    Err(InsightError::NoJsonFound)
}

/// Byte offset just past the brace closing the one at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
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
    use serde_json::json;

    #[test]
    fn whole_output_is_used_when_valid() {
        let value = extract_json(r#" {"title":"Rest"} "#).unwrap();
        assert_eq!(value, json!({"title": "Rest"}));
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "Here you go:\n```json\n{\"title\": \"Rest\", \"tips\": [1, 2]}\n```\nEnjoy!";
        assert_eq!(extract_json(raw).unwrap(), json!({"title": "Rest", "tips": [1, 2]}));
    }

    #[test]
    fn braces_inside_strings_do_not_unbalance() {
        let raw = r#"note {"text": "use } and { freely", "n": {"x": 1}} trailing }"#;
        assert_eq!(
            extract_json(raw).unwrap(),
            json!({"text": "use } and { freely", "n": {"x": 1}})
        );
    }

    #[test]
    fn escaped_quotes_stay_inside_string() {
        let raw = r#"x {"q": "say \"}\" now"} y"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"q": "say \"}\" now"}));
    }

    #[test]
    fn skips_unparseable_region_and_takes_next() {
        let raw = r#"{not json} then {"ok": true}"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn fails_without_object() {
        assert_eq!(extract_json("no braces here"), Err(InsightError::NoJsonFound));
        assert_eq!(extract_json("{ unterminated"), Err(InsightError::NoJsonFound));
    }
}
