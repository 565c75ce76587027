//! Error types and the exit status taxonomy.

use std::fmt;

use thiserror::Error;

/// Document formats a field is extracted from, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
    DetectionRule,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::DetectionRule => "detection rule",
        })
    }
}

/// Why a query could not be extracted from a single input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("field '{field}' not found in {format} input")]
    FieldNotFound {
        field: String,
        format: DocumentFormat,
    },

    #[error("field '{field}' is null in {format} input")]
    NullField {
        field: String,
        format: DocumentFormat,
    },

    #[error("field '{field}' is not a scalar value")]
    NotScalar { field: String },

    #[error("{format} input has errors: {message}")]
    MalformedDocument {
        format: DocumentFormat,
        message: String,
    },

    #[error("field \"rule.query\" not found in detection rule")]
    MissingQueryField,

    #[error("input is not valid UTF-8")]
    InvalidEncoding,
}

/// Failures that end a run. Each carries the input it happened on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidatorError {
    #[error("cannot combine positional argument '{literal}' with --files")]
    AmbiguousInvocation { literal: String },

    #[error("I/O error on {input}: {source}")]
    Io {
        input: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{input}: {source}")]
    Extraction {
        input: String,
        #[source]
        source: ExtractionError,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{input}: exceeds maximum size of {limit} bytes")]
    FileTooLarge { input: String, limit: u64 },
}

impl ValidatorError {
    /// Classification of this failure.
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::AmbiguousInvocation { .. } => ExitStatus::UsageError,
            Self::Io { .. } => ExitStatus::IoFailure,
            Self::Extraction { .. } => ExitStatus::InputFormatError,
            Self::InvalidPattern { .. } | Self::FileTooLarge { .. } => ExitStatus::RuntimeError,
        }
    }
}

/// Process outcome classes and their stable exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// All inputs valid or skipped.
    Success,
    /// An input failed syntax validation.
    ValidationFailure,
    /// Conflicting command-line inputs.
    UsageError,
    IoFailure,
    /// Malformed document, missing or null field, bad encoding.
    InputFormatError,
    RuntimeError,
    UnexpectedError,
}

impl ExitStatus {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ValidationFailure => 1,
            Self::UsageError => 2,
            Self::IoFailure => 10,
            Self::InputFormatError => 11,
            Self::RuntimeError => 90,
            Self::UnexpectedError => 99,
        }
    }

    /// Classify an error surfaced from [`crate::run`].
    ///
    /// Anything that is not a [`ValidatorError`] (for example a closed stdout
    /// while writing a status line) is unexpected.
    #[must_use]
    pub fn of(err: &anyhow::Error) -> Self {
        err.downcast_ref::<ValidatorError>()
            .map_or(Self::UnexpectedError, ValidatorError::exit_status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_stable() {
        let codes: Vec<u8> = [
            ExitStatus::Success,
            ExitStatus::ValidationFailure,
            ExitStatus::UsageError,
            ExitStatus::IoFailure,
            ExitStatus::InputFormatError,
            ExitStatus::RuntimeError,
            ExitStatus::UnexpectedError,
        ]
        .into_iter()
        .map(ExitStatus::code)
        .collect();
        assert_eq!(codes, vec![0, 1, 2, 10, 11, 90, 99]);
    }

    #[test]
    fn test_validator_error_classification() {
        let ambiguous = ValidatorError::AmbiguousInvocation {
            literal: "FROM a".to_owned(),
        };
        assert_eq!(ambiguous.exit_status(), ExitStatus::UsageError);

        let io = ValidatorError::Io {
            input: "a.toml".to_owned(),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(io.exit_status(), ExitStatus::IoFailure);

        let extraction = ValidatorError::Extraction {
            input: "<stdin>".to_owned(),
            source: ExtractionError::InvalidEncoding,
        };
        assert_eq!(extraction.exit_status(), ExitStatus::InputFormatError);

        let pattern = ValidatorError::InvalidPattern {
            pattern: "[".to_owned(),
            source: glob::Pattern::new("[").unwrap_err(),
        };
        assert_eq!(pattern.exit_status(), ExitStatus::RuntimeError);

        let too_large = ValidatorError::FileTooLarge {
            input: "big.esql".to_owned(),
            limit: 4,
        };
        assert_eq!(too_large.exit_status(), ExitStatus::RuntimeError);
    }

    #[test]
    fn test_unclassified_errors_are_unexpected() {
        let err = anyhow::anyhow!("broken pipe");
        assert_eq!(ExitStatus::of(&err), ExitStatus::UnexpectedError);

        let err = anyhow::Error::new(ValidatorError::FileTooLarge {
            input: "x".to_owned(),
            limit: 1,
        });
        assert_eq!(ExitStatus::of(&err), ExitStatus::RuntimeError);
    }

    #[test]
    fn test_messages_name_the_input() {
        let err = ValidatorError::Extraction {
            input: "rules/a.json".to_owned(),
            source: ExtractionError::FieldNotFound {
                field: "query".to_owned(),
                format: DocumentFormat::Json,
            },
        };
        assert_eq!(
            err.to_string(),
            "rules/a.json: field 'query' not found in JSON input"
        );
    }
}
