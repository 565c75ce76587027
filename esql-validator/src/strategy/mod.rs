//! Input source strategies.
//!
//! `select` decides which single logical source a run reads from. File
//! access goes through the [`FileSource`] trait so a run can be exercised
//! against an instrumented filesystem; `fs::LocalFs` is the real one.

pub mod fs;
pub mod select;

use std::path::{Path, PathBuf};

use crate::error::ValidatorError;

/// The logical input of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Every file matched by these patterns, resolved in order.
    Files(Vec<String>),
    /// The positional argument.
    Literal(String),
    /// Standard input.
    Stdin,
}

/// Label used for an input in status lines and errors.
pub const LITERAL_LABEL: &str = "<literal>";
pub const STDIN_LABEL: &str = "<stdin>";

/// Discovery and bounded reads of files.
pub trait FileSource {
    /// Resolve a glob pattern to an ordered list of existing regular files.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for bad glob syntax, `Io` if traversal fails.
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>, ValidatorError>;

    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened or read, `FileTooLarge` if it exceeds
    /// the configured limit.
    fn read(&self, path: &Path) -> Result<Vec<u8>, ValidatorError>;
}
