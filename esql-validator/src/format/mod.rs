//! Format-specific query extractors.
//!
//! Each sub-module turns the text of one input into an [`Extraction`]:
//! - `raw`: the text itself
//! - `json_field`: a named field of a JSON document
//! - `toml_field`: a named (dotted) key of a TOML document
//! - `detection_rule`: `rule.query` of an ES|QL-typed detection rule

pub mod detection_rule;
pub mod json_field;
mod path;
pub mod raw;
pub mod toml_field;

use crate::config::InputFormat;
use crate::error::ExtractionError;

/// Result of extracting a query from one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The input carries no ES|QL query and must not be validated.
    Skip,
    /// The candidate query text.
    Extracted(String),
}

impl InputFormat {
    /// Extract the candidate query from the raw bytes of one input.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` if `bytes` is not UTF-8; otherwise whatever the
    /// selected extractor reports.
    pub fn extract(&self, bytes: &[u8]) -> Result<Extraction, ExtractionError> {
        let content = std::str::from_utf8(bytes).map_err(|_| ExtractionError::InvalidEncoding)?;
        match self {
            Self::Raw => Ok(raw::extract(content)),
            Self::Json(field) => json_field::extract(content, field),
            Self::Toml(field) => toml_field::extract(content, field),
            Self::DetectionRule => detection_rule::extract(content),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_passes_text_through() {
        let result = InputFormat::Raw.extract(b"FROM logs | LIMIT 1").unwrap();
        assert_eq!(result, Extraction::Extracted("FROM logs | LIMIT 1".to_owned()));
    }

    #[test]
    fn test_dispatch_by_format() {
        let json = InputFormat::Json("q".to_owned());
        assert_eq!(
            json.extract(br#"{"q": "ROW a = 1"}"#).unwrap(),
            Extraction::Extracted("ROW a = 1".to_owned())
        );

        let toml = InputFormat::Toml("q".to_owned());
        assert_eq!(
            toml.extract(b"q = \"ROW a = 1\"").unwrap(),
            Extraction::Extracted("ROW a = 1".to_owned())
        );

        let rule = InputFormat::DetectionRule;
        assert_eq!(
            rule.extract(b"[rule]\ntype = \"query\"\n").unwrap(),
            Extraction::Skip
        );
    }

    #[test]
    fn test_invalid_utf8_is_rejected_for_every_format() {
        let bytes = [0x46, 0x52, 0xff, 0x4f];
        for format in [
            InputFormat::Raw,
            InputFormat::Json("q".to_owned()),
            InputFormat::Toml("q".to_owned()),
            InputFormat::DetectionRule,
        ] {
            assert_eq!(
                format.extract(&bytes).unwrap_err(),
                ExtractionError::InvalidEncoding
            );
        }
    }
}
