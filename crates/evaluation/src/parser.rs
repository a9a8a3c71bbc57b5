use serde_json::{Map, Value};

/// Decode raw model output as a JSON object.
///
/// Returns `(Some(object), true)` on success and `(None, false)` when the
/// text is not JSON or its top level is not an object. Never fails.
pub fn parse_response(raw: &str) -> (Option<Map<String, Value>>, bool) {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => (Some(map), true),
        Ok(_) | Err(_) => (None, false),
    }
}

/// Exact numeric match of a parsed prediction field against a label.
/// `4` and `4.0` match 4; `"4"` does not.
pub fn matches_label(value: &Value, label: i64) -> bool {
    if let Some(n) = value.as_i64() {
        return n == label;
    }
    value.as_f64().is_some_and(|f| f == label as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_round_trip() {
        for k in 1..=5 {
            let raw = format!(r#"{{"predicted_stars": {k}}}"#);
            let (value, ok) = parse_response(&raw);
            assert!(ok);
            let mut expected = Map::new();
            expected.insert("predicted_stars".into(), json!(k));
            assert_eq!(value, Some(expected));
        }
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let (value, ok) = parse_response("\n  {\"predicted_stars\": 3, \"explanation\": \"meh\"}  \n");
        assert!(ok);
        assert_eq!(value.unwrap()["explanation"], json!("meh"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_response("{\"predicted_stars\": 4"), (None, false));
        assert_eq!(parse_response("Rating: 4 stars"), (None, false));
        assert_eq!(parse_response(""), (None, false));
    }

    #[test]
    fn test_parse_rejects_non_object_top_level() {
        assert_eq!(parse_response("4"), (None, false));
        assert_eq!(parse_response("[{\"predicted_stars\": 4}]"), (None, false));
        assert_eq!(parse_response("null"), (None, false));
    }

    #[test]
    fn test_code_fence_is_invalid() {
        let raw = "```json\n{\"predicted_stars\": 5}\n```";
        assert_eq!(parse_response(raw), (None, false));
    }

    #[test]
    fn test_matches_label_numeric_only() {
        assert!(matches_label(&json!(4), 4));
        assert!(matches_label(&json!(4.0), 4));
        assert!(!matches_label(&json!(4.5), 4));
        assert!(!matches_label(&json!("4"), 4));
        assert!(!matches_label(&json!(null), 4));
        assert!(!matches_label(&json!(3), 4));
    }
}
