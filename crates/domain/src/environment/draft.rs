//! Draft text codec for variable maps.
//!
//! Drafts are pretty-printed JSON objects. Serializing an unedited map and parsing it back
//! yields the same map with the same key order.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::variable::{VariableMap, VariableValue};
use crate::error::{DomainError, DomainResult};

/// Indentation used for drafts unless configured otherwise.
pub const DEFAULT_INDENT: usize = 2;

/// Serializes variables into draft text.
///
/// Output has no trailing newline; an empty map renders as `{}`.
#[must_use]
pub fn serialize_variables(variables: &VariableMap, indent: usize) -> String {
    let indent = b" ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
    // Writing string-keyed primitives into a Vec cannot fail.
    if variables.serialize(&mut serializer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Parses draft text into a flat variable map.
///
/// Anything that is not a JSON object of string, number, boolean or null values is
/// rejected, including blank text.
///
/// # Errors
///
/// Returns [`DomainError::InvalidFormat`] when the text is not valid JSON, is not an
/// object, or holds a nested array/object value.
pub fn parse_variables(text: &str) -> DomainResult<VariableMap> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DomainError::InvalidFormat(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(DomainError::InvalidFormat(
            "expected a JSON object of variables".to_string(),
        ));
    };

    object
        .into_iter()
        .map(|(name, value)| match VariableValue::try_from(value) {
            Ok(value) => Ok((name, value)),
            Err(_) => Err(DomainError::InvalidFormat(format!(
                "variable `{name}` must be a string, number, boolean or null"
            ))),
        })
        .collect()
}

/// Like [`parse_variables`], but whitespace-only text is an empty map.
///
/// Only used to compare a draft against its baseline; commits go through the
/// strict parser.
///
/// # Errors
///
/// Same as [`parse_variables`] for non-blank text.
pub(crate) fn parse_draft_lenient(text: &str) -> DomainResult<VariableMap> {
    if text.trim().is_empty() {
        return Ok(VariableMap::new());
    }
    parse_variables(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> VariableMap {
        let mut vars = VariableMap::new();
        vars.insert("host".to_string(), "a.com".into());
        vars.insert("port".to_string(), 443_i64.into());
        vars.insert("secure".to_string(), true.into());
        vars
    }

    #[test]
    fn test_serialize_uses_two_space_indent() {
        let text = serialize_variables(&sample(), DEFAULT_INDENT);
        assert_eq!(
            text,
            "{\n  \"host\": \"a.com\",\n  \"port\": 443,\n  \"secure\": true\n}"
        );
    }

    #[test]
    fn test_serialize_empty_map() {
        assert_eq!(serialize_variables(&VariableMap::new(), DEFAULT_INDENT), "{}");
    }

    #[test]
    fn test_serialize_custom_indent() {
        let mut vars = VariableMap::new();
        vars.insert("a".to_string(), "b".into());
        assert_eq!(serialize_variables(&vars, 4), "{\n    \"a\": \"b\"\n}");
    }

    #[test]
    fn test_unedited_draft_round_trips_byte_for_byte() {
        let text = serialize_variables(&sample(), DEFAULT_INDENT);
        let parsed = parse_variables(&text).expect("draft should parse");
        assert_eq!(serialize_variables(&parsed, DEFAULT_INDENT), text);
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let parsed = parse_variables(r#"{"zeta": "1", "alpha": "2"}"#).unwrap();
        let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_parse_trailing_comma_is_invalid() {
        let result = parse_variables(r#"{"a":1,}"#);
        assert!(matches!(result, Err(DomainError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_variables("[1, 2]"),
            Err(DomainError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_variables("\"text\""),
            Err(DomainError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_nested_values() {
        let err = parse_variables(r#"{"auth": {"user": "x"}}"#).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidFormat(
                "variable `auth` must be a string, number, boolean or null".to_string()
            )
        );
    }

    #[test]
    fn test_parse_blank_text_is_invalid() {
        assert!(matches!(parse_variables(""), Err(DomainError::InvalidFormat(_))));
        assert!(matches!(
            parse_variables("  \n"),
            Err(DomainError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_lenient_parse_treats_blank_as_empty_map() {
        assert!(parse_draft_lenient("").unwrap().is_empty());
        assert!(parse_draft_lenient("  \n").unwrap().is_empty());
        assert!(parse_draft_lenient(r#"{"a":1,}"#).is_err());
    }

    #[test]
    fn test_parse_accepts_null() {
        let parsed = parse_variables(r#"{"token": null}"#).unwrap();
        assert_eq!(parsed.get("token"), Some(&VariableValue::Null));
    }
}
