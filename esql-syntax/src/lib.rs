//! ES|QL statement syntax checking.
//!
//! This crate answers a single question: is a piece of text one well-formed
//! ES|QL statement? It does not resolve fields, functions or types. A failure
//! carries the location of the first offending token so callers can point the
//! user at it.
//!
//! ```rust
//! assert!(esql_syntax::check("FROM logs | WHERE x > 1").is_ok());
//!
//! let err = esql_syntax::check("FROM logs WHERE").unwrap_err();
//! assert_eq!((err.line, err.column), (1, 10));
//! ```

mod lexer;
mod parser;

use thiserror::Error;

use crate::lexer::Position;
use crate::parser::Parser;

pub use crate::parser::MAX_NESTING;

/// The first syntax error found in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at line {line}:{column} - {message}.")]
pub struct SyntaxError {
    /// 1-based line of the offending token.
    pub line: usize,
    /// 0-based character offset of the offending token within its line.
    pub column: usize,
    /// Parser diagnostic, e.g. `mismatched input 'WHERE' expecting {<EOF>, '|'}`.
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn at(position: Position, message: String) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message,
        }
    }
}

/// Check that `text` is exactly one ES|QL statement.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] encountered, either from tokenization
/// (an unrecognized character, an unterminated string or comment) or from
/// parsing (a token the grammar does not allow at that position).
pub fn check(text: &str) -> Result<(), SyntaxError> {
    Parser::new(text).single_statement()
}
