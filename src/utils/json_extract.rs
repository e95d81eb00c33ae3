use crate::error::{Error, Result};
use serde_json::Value as JsonValue;

/// Recover a JSON value from free-form model output.
///
/// Code fences (with an optional `json` label) are stripped first. A direct
/// parse of the whole text is tried before falling back to the outermost
/// `{ ... }` span, since the span heuristic will happily accept a truncated
/// reply that merely looks balanced.
pub fn parse_json_output(text: &str) -> Result<JsonValue> {
    let mut text = text.trim();

    if text.starts_with("```") {
        text = text.trim_matches('`').trim();
        if text
            .get(..4)
            .is_some_and(|label| label.eq_ignore_ascii_case("json"))
        {
            text = text[4..].trim();
        }
    }

    if let Ok(value) = serde_json::from_str::<JsonValue>(text) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return serde_json::from_str(&text[start..=end]).map_err(|_| Error::UnparsableOutput);
        }
    }

    Err(Error::UnparsableOutput)
}
