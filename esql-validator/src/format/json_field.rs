//! Query extraction from a named field of a JSON document.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::{DocumentFormat, ExtractionError};
use crate::format::Extraction;
use crate::format::path::split_dotted;

/// Extract the value of `field` from a JSON document.
///
/// An exact top-level key wins; otherwise a dotted `field` is walked through
/// nested objects. When an object repeats a key, its first occurrence is the
/// one that counts.
///
/// # Errors
///
/// `MalformedDocument` for invalid JSON, `FieldNotFound` when no value is at
/// `field`, `NullField` for `null` and `NotScalar` for objects and arrays.
pub fn extract(content: &str, field: &str) -> Result<Extraction, ExtractionError> {
    let FirstWins(document) =
        serde_json::from_str(content).map_err(|e| ExtractionError::MalformedDocument {
            format: DocumentFormat::Json,
            message: e.to_string(),
        })?;

    let value = document
        .as_object()
        .and_then(|root| lookup(root, field))
        .ok_or_else(|| ExtractionError::FieldNotFound {
            field: field.to_owned(),
            format: DocumentFormat::Json,
        })?;

    scalar_text(value, field).map(Extraction::Extracted)
}

/// A JSON value whose objects keep the first value of a repeated key.
struct FirstWins(Value);

impl<'de> Deserialize<'de> for FirstWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FirstWinsVisitor).map(FirstWins)
    }
}

struct FirstWinsVisitor;

impl<'de> Visitor<'de> for FirstWinsVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(FirstWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some((key, FirstWins(value))) = map.next_entry::<String, FirstWins>()? {
            object.entry(key).or_insert(value);
        }
        Ok(Value::Object(object))
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    if let Some(value) = root.get(field) {
        return Some(value);
    }
    let segments = split_dotted(field)?;
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |current, segment| current.get(segment))
}

fn scalar_text(value: &Value, field: &str) -> Result<String, ExtractionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(ExtractionError::NullField {
            field: field.to_owned(),
            format: DocumentFormat::Json,
        }),
        Value::Array(_) | Value::Object(_) => Err(ExtractionError::NotScalar {
            field: field.to_owned(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn extracted(text: &str) -> Extraction {
        Extraction::Extracted(text.to_owned())
    }

    #[test]
    fn test_top_level_field() {
        let result = extract(r#"{"query": "FROM x"}"#, "query").unwrap();
        assert_eq!(result, extracted("FROM x"));
    }

    #[test]
    fn test_missing_field() {
        let err = extract(r#"{"other": 1}"#, "query").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::FieldNotFound {
                field: "query".to_owned(),
                format: DocumentFormat::Json,
            }
        );
    }

    #[test]
    fn test_dotted_path_walks_nested_objects() {
        let doc = r#"{"rule": {"query": "FROM logs | LIMIT 1"}}"#;
        assert_eq!(
            extract(doc, "rule.query").unwrap(),
            extracted("FROM logs | LIMIT 1")
        );
    }

    #[test]
    fn test_exact_key_with_dot_wins() {
        let doc = r#"{"rule.query": "FROM a", "rule": {"query": "FROM b"}}"#;
        assert_eq!(extract(doc, "rule.query").unwrap(), extracted("FROM a"));
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let doc = r#"{"query": "FROM first", "query": "FROM second"}"#;
        assert_eq!(extract(doc, "query").unwrap(), extracted("FROM first"));

        let nested = r#"{"rule": {"query": "FROM a", "query": null}}"#;
        assert_eq!(extract(nested, "rule.query").unwrap(), extracted("FROM a"));
    }

    #[test]
    fn test_scalars_are_stringified() {
        assert_eq!(extract(r#"{"n": 42}"#, "n").unwrap(), extracted("42"));
        assert_eq!(extract(r#"{"b": true}"#, "b").unwrap(), extracted("true"));
    }

    #[test]
    fn test_null_and_structured_values_fail() {
        assert!(matches!(
            extract(r#"{"q": null}"#, "q").unwrap_err(),
            ExtractionError::NullField { .. }
        ));
        assert!(matches!(
            extract(r#"{"q": ["FROM a"]}"#, "q").unwrap_err(),
            ExtractionError::NotScalar { .. }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = extract(r#"{"query": "#, "query").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MalformedDocument {
                format: DocumentFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_root_has_no_fields() {
        assert!(matches!(
            extract(r#"["query"]"#, "query").unwrap_err(),
            ExtractionError::FieldNotFound { .. }
        ));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = r#"{"query": "FROM x"}"#;
        assert_eq!(
            extract(doc, "query").unwrap(),
            extract(doc, "query").unwrap()
        );
    }
}
