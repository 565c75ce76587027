//! Per-input results and the run outcome.

use serde::Serialize;

use crate::error::ExitStatus;

/// Outcome of validating one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid {
        /// 1-based line of the offending token.
        line: usize,
        /// 0-based column of the offending token.
        column: usize,
        message: String,
    },
    /// The input carries no ES|QL query.
    Skipped,
}

impl From<Result<(), esql_syntax::SyntaxError>> for ValidationResult {
    fn from(checked: Result<(), esql_syntax::SyntaxError>) -> Self {
        match checked {
            Ok(()) => Self::Valid,
            Err(err) => Self::Invalid {
                line: err.line,
                column: err.column,
                message: err.message,
            },
        }
    }
}

/// The input that ended a run, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub input: String,
    pub reason: String,
}

/// Aggregate over every input processed in a run.
///
/// Processing stops at the first invalid input, so `first_failure` is also
/// the only failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct RunOutcome {
    pub overall_failed: bool,
    pub first_failure: Option<Failure>,
    /// Inputs processed, whatever their result.
    pub checked: usize,
    pub valid: usize,
    pub skipped: usize,
}

impl RunOutcome {
    /// Fold one input's result into the outcome.
    pub fn record(&mut self, input: &str, result: &ValidationResult) {
        self.checked += 1;
        match result {
            ValidationResult::Valid => self.valid += 1,
            ValidationResult::Skipped => self.skipped += 1,
            ValidationResult::Invalid {
                line,
                column,
                message,
            } => {
                self.overall_failed = true;
                if self.first_failure.is_none() {
                    self.first_failure = Some(Failure {
                        input: input.to_owned(),
                        reason: format!("Syntax error at line {line}:{column} - {message}."),
                    });
                }
            }
        }
    }

    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        if self.overall_failed {
            ExitStatus::ValidationFailure
        } else {
            ExitStatus::Success
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_succeeds() {
        let outcome = RunOutcome::default();
        assert_eq!(outcome.exit_status(), ExitStatus::Success);
        assert_eq!(outcome.checked, 0);
    }

    #[test]
    fn test_record_counts_and_first_failure() {
        let mut outcome = RunOutcome::default();
        outcome.record("a.esql", &ValidationResult::Valid);
        outcome.record("b.toml", &ValidationResult::Skipped);
        outcome.record(
            "c.esql",
            &ValidationResult::Invalid {
                line: 1,
                column: 10,
                message: "mismatched input 'WHERE' expecting <EOF>".to_owned(),
            },
        );

        assert_eq!((outcome.checked, outcome.valid, outcome.skipped), (3, 1, 1));
        assert_eq!(outcome.exit_status(), ExitStatus::ValidationFailure);
        let failure = outcome.first_failure.unwrap();
        assert_eq!(failure.input, "c.esql");
        assert_eq!(
            failure.reason,
            "Syntax error at line 1:10 - mismatched input 'WHERE' expecting <EOF>."
        );
    }

    #[test]
    fn test_result_from_syntax_check() {
        assert_eq!(
            ValidationResult::from(esql_syntax::check("FROM logs")),
            ValidationResult::Valid
        );
        let invalid = ValidationResult::from(esql_syntax::check("FROM logs WHERE"));
        assert!(matches!(
            invalid,
            ValidationResult::Invalid {
                line: 1,
                column: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_result_serializes_with_status_tag() {
        let json = serde_json::to_value(ValidationResult::Invalid {
            line: 2,
            column: 0,
            message: "m".to_owned(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "invalid", "line": 2, "column": 0, "message": "m"})
        );
        assert_eq!(
            serde_json::to_value(ValidationResult::Skipped).unwrap(),
            serde_json::json!({"status": "skipped"})
        );
    }
}
