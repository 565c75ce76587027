//! Input mode selection.

use crate::config::InvocationConfig;
use crate::error::ValidatorError;
use crate::strategy::InputSource;

/// Pick the single input source of a run.
///
/// Evaluated in priority order: file patterns together with a literal is
/// rejected, then file patterns, then the literal, then stdin. Performs no I/O.
///
/// # Errors
///
/// `AmbiguousInvocation` when both file patterns and a literal are given.
pub fn select(config: &InvocationConfig) -> Result<InputSource, ValidatorError> {
    match (&config.literal_input, config.file_patterns.is_empty()) {
        (Some(literal), false) => Err(ValidatorError::AmbiguousInvocation {
            literal: literal.clone(),
        }),
        (None, false) => Ok(InputSource::Files(config.file_patterns.clone())),
        (Some(literal), true) => Ok(InputSource::Literal(literal.clone())),
        (None, true) => Ok(InputSource::Stdin),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(literal: Option<&str>, patterns: &[&str]) -> InvocationConfig {
        let mut config = InvocationConfig::default();
        config.literal_input = literal.map(str::to_owned);
        config.file_patterns = patterns.iter().map(|p| (*p).to_owned()).collect();
        config
    }

    #[test]
    fn test_patterns_and_literal_are_ambiguous() {
        let err = select(&config(Some("FROM a"), &["*.esql"])).unwrap_err();
        assert!(matches!(err, ValidatorError::AmbiguousInvocation { .. }));
    }

    #[test]
    fn test_patterns_keep_their_order() {
        let source = select(&config(None, &["b/*.toml", "a/*.toml"])).unwrap();
        assert_eq!(
            source,
            InputSource::Files(vec!["b/*.toml".to_owned(), "a/*.toml".to_owned()])
        );
    }

    #[test]
    fn test_literal() {
        let source = select(&config(Some("FROM a"), &[])).unwrap();
        assert_eq!(source, InputSource::Literal("FROM a".to_owned()));
    }

    #[test]
    fn test_stdin_when_nothing_given() {
        assert_eq!(select(&config(None, &[])).unwrap(), InputSource::Stdin);
    }
}
