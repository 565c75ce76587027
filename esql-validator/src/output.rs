//! Per-input status lines.
//!
//! Status lines are the observable contract of a run: exactly one line per
//! processed input. In text mode valid and skipped inputs go to the standard
//! writer and invalid ones to the error writer; in JSON mode every line is a
//! JSON object on the standard writer. Color is left to the CLI layer.

use std::io::Write;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::report::ValidationResult;

#[derive(Serialize)]
struct StatusLine<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

/// Destination for status lines.
pub struct StatusWriter<'a> {
    format: OutputFormat,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> StatusWriter<'a> {
    #[must_use]
    pub fn new(format: OutputFormat, out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { format, out, err }
    }

    /// Write the status line for `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write(&mut self, input: &str, result: &ValidationResult) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(input, result, self.out),
            OutputFormat::Text => write_text(input, result, self.out, self.err),
        }
    }
}

/// Format one status line as a single-line JSON object.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(
    input: &str,
    result: &ValidationResult,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(&StatusLine { input, result })?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format one status line as plain text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text(
    input: &str,
    result: &ValidationResult,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<()> {
    match result {
        ValidationResult::Valid => writeln!(out, "{input}: \u{2713} valid")?,
        ValidationResult::Skipped => {
            writeln!(out, "{input}: skipped (not an ES|QL detection rule)")?;
        }
        ValidationResult::Invalid {
            line,
            column,
            message,
        } => writeln!(
            err,
            "{input}:{line}:{column}: \u{2717} Syntax error at line {line}:{column} - {message}."
        )?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(format: OutputFormat, result: &ValidationResult) -> (String, String) {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        StatusWriter::new(format, &mut out, &mut err)
            .write("rules/a.toml", result)
            .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    fn invalid() -> ValidationResult {
        ValidationResult::Invalid {
            line: 1,
            column: 10,
            message: "mismatched input 'WHERE' expecting <EOF>".to_owned(),
        }
    }

    #[test]
    fn test_text_valid_goes_to_stdout() {
        let (out, err) = render(OutputFormat::Text, &ValidationResult::Valid);
        assert_eq!(out, "rules/a.toml: \u{2713} valid\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_text_skipped_is_distinct() {
        let (out, _) = render(OutputFormat::Text, &ValidationResult::Skipped);
        assert_eq!(out, "rules/a.toml: skipped (not an ES|QL detection rule)\n");
    }

    #[test]
    fn test_text_invalid_goes_to_stderr_with_location() {
        let (out, err) = render(OutputFormat::Text, &invalid());
        assert!(out.is_empty());
        assert_eq!(
            err,
            "rules/a.toml:1:10: \u{2717} Syntax error at line 1:10 - \
             mismatched input 'WHERE' expecting <EOF>.\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let (out, err) = render(OutputFormat::Json, &invalid());
        assert!(err.is_empty());
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["input"], "rules/a.toml");
        assert_eq!(value["status"], "invalid");
        assert_eq!(value["line"], 1);
        assert_eq!(value["column"], 10);

        let (out, _) = render(OutputFormat::Json, &ValidationResult::Valid);
        assert_eq!(out, "{\"input\":\"rules/a.toml\",\"status\":\"valid\"}\n");
    }
}
