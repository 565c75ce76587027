//! Query extraction from a key of a TOML document.

use toml::{Table, Value};

use crate::error::{DocumentFormat, ExtractionError};
use crate::format::Extraction;
use crate::format::path::split_dotted;

/// Parse a whole TOML document.
///
/// # Errors
///
/// `MalformedDocument` tagged with `format` if the document does not parse.
pub fn parse(content: &str, format: DocumentFormat) -> Result<Table, ExtractionError> {
    content
        .parse::<Table>()
        .map_err(|e| ExtractionError::MalformedDocument {
            format,
            message: e.message().to_owned(),
        })
}

/// Look up a key that is either an exact top-level key or a dotted path.
#[must_use]
pub fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    if let Some(value) = table.get(key) {
        return Some(value);
    }
    let segments = split_dotted(key)?;
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(table.get(first)?, |current, segment| current.get(segment))
}

/// Text of a TOML value: strings verbatim, everything else in TOML notation.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract the value at `field` from a TOML document.
///
/// # Errors
///
/// `MalformedDocument` if the document does not parse, `FieldNotFound` if
/// nothing is stored at `field`.
pub fn extract(content: &str, field: &str) -> Result<Extraction, ExtractionError> {
    let table = parse(content, DocumentFormat::Toml)?;
    let value = lookup(&table, field).ok_or_else(|| ExtractionError::FieldNotFound {
        field: field.to_owned(),
        format: DocumentFormat::Toml,
    })?;
    Ok(Extraction::Extracted(value_text(value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn extracted(text: &str) -> Extraction {
        Extraction::Extracted(text.to_owned())
    }

    #[test]
    fn test_top_level_string() {
        let doc = "query = \"FROM logs | LIMIT 1\"\n";
        assert_eq!(
            extract(doc, "query").unwrap(),
            extracted("FROM logs | LIMIT 1")
        );
    }

    #[test]
    fn test_integer_value_is_stringified() {
        assert_eq!(extract("title = 42\n", "title").unwrap(), extracted("42"));
    }

    #[test]
    fn test_dotted_key_into_table() {
        let doc = "[rule]\nquery = '''\nFROM logs\n| WHERE x > 1\n'''\n";
        assert_eq!(
            extract(doc, "rule.query").unwrap(),
            extracted("FROM logs\n| WHERE x > 1\n")
        );
    }

    #[test]
    fn test_quoted_key_segment() {
        let doc = "[a]\n\"b.c\" = \"FROM x\"\n";
        assert_eq!(extract(doc, "a.\"b.c\"").unwrap(), extracted("FROM x"));
    }

    #[test]
    fn test_missing_field() {
        let err = extract("other = 1\n", "query").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::FieldNotFound {
                field: "query".to_owned(),
                format: DocumentFormat::Toml,
            }
        );
    }

    #[test]
    fn test_malformed_document() {
        let err = extract("query = \n", "query").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MalformedDocument {
                format: DocumentFormat::Toml,
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_through_non_table_is_absent() {
        let table = parse("rule = \"x\"\n", DocumentFormat::Toml).unwrap();
        assert!(lookup(&table, "rule.query").is_none());
    }
}
