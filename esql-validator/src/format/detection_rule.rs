//! Elastic detection rules.
//!
//! A rule is a TOML document with a `[rule]` table. Only rules whose
//! `rule.type` is exactly `"esql"` carry an ES|QL query in `rule.query`; any
//! other rule is skipped rather than reported.

use toml::Value;

use crate::error::{DocumentFormat, ExtractionError};
use crate::format::Extraction;
use crate::format::toml_field::{lookup, parse, value_text};

const ESQL_RULE_TYPE: &str = "esql";

/// Extract `rule.query` from an ES|QL detection rule.
///
/// # Errors
///
/// `MalformedDocument` if the rule is not valid TOML, `MissingQueryField` if
/// an ES|QL rule has no `rule.query`.
pub fn extract(content: &str) -> Result<Extraction, ExtractionError> {
    let rule = parse(content, DocumentFormat::DetectionRule)?;

    match lookup(&rule, "rule.type") {
        Some(Value::String(rule_type)) if rule_type == ESQL_RULE_TYPE => {}
        _ => return Ok(Extraction::Skip),
    }

    let query = lookup(&rule, "rule.query").ok_or(ExtractionError::MissingQueryField)?;
    Ok(Extraction::Extracted(value_text(query)))
}
