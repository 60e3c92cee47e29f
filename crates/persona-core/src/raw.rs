//! Defensive normalization of enrichment payloads.
//!
//! The enrichment workflow writes the two raw persona fields inconsistently:
//! sometimes a structured JSON document, sometimes a JSON-encoded string that
//! itself contains a document. Every consumer goes through [`normalize`] (or
//! [`normalize_text`] for values read straight from a TEXT column) so the rest
//! of the system only ever sees a non-empty structured document or "absent".

use serde_json::Value;

/// Normalize an in-memory raw field to a structured document.
///
/// Returns `None` for null values, strings that do not parse as JSON, and
/// documents with no entries. A `Value::String` is parsed one level deep, so
/// a field delivered as `"{\"a\":1}"` yields the document `{"a":1}`.
pub fn normalize(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner) => non_empty_document(inner),
            // Malformed JSON counts as absent, never as an error.
            Err(_) => None,
        },
        other => non_empty_document(other.clone()),
    }
}

/// Normalize a raw field read from a TEXT column.
///
/// The column text is expected to be JSON; anything else counts as absent.
pub fn normalize_text(text: Option<&str>) -> Option<Value> {
    let text = text?;
    let value: Value = serde_json::from_str(text).ok()?;
    normalize(&value)
}

/// A field counts as present only if it is a document with at least one entry.
fn non_empty_document(value: Value) -> Option<Value> {
    match &value {
        Value::Object(map) if !map.is_empty() => Some(value),
        Value::Array(items) if !items.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_document_passes_through() {
        let value = json!({"headline": "PM", "positions": []});
        assert_eq!(normalize(&value), Some(value.clone()));
    }

    #[test]
    fn test_string_encoded_document_is_parsed() {
        let value = json!("{\"a\":1}");
        assert_eq!(normalize(&value), Some(json!({"a": 1})));
    }

    #[test]
    fn test_malformed_string_is_absent() {
        assert_eq!(normalize(&json!("{not json")), None);
    }

    #[test]
    fn test_empty_documents_are_absent() {
        assert_eq!(normalize(&json!({})), None);
        assert_eq!(normalize(&json!([])), None);
        assert_eq!(normalize(&Value::Null), None);
    }

    #[test]
    fn test_scalars_are_absent() {
        assert_eq!(normalize(&json!(42)), None);
        assert_eq!(normalize(&json!(true)), None);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text(Some("{\"a\":1}")),
            Some(json!({"a": 1}))
        );
        // A column holding a JSON string that wraps a document.
        assert_eq!(
            normalize_text(Some("\"{\\\"a\\\":1}\"")),
            Some(json!({"a": 1}))
        );
        assert_eq!(normalize_text(Some("not json")), None);
        assert_eq!(normalize_text(None), None);
    }
}
