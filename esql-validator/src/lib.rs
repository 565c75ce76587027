//! # esql-validator
//!
//! Syntax validation for ES|QL statements found in raw text, JSON and TOML
//! documents, and Elastic detection rules.
//!
//! A run reads from exactly one source (files matched by glob patterns, a
//! literal argument, or stdin), extracts the candidate query from each input,
//! checks it with [`esql_syntax::check`] and writes one status line per input.
//! Multi-file runs stop at the first invalid input.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esql_validator::{InputFormat, InvocationConfig, LocalFs, run};
//!
//! let mut config = InvocationConfig::default();
//! config.file_patterns = vec!["rules/**/*.toml".to_owned()];
//! config.format = InputFormat::DetectionRule;
//!
//! let fs = LocalFs::new(config.limits.clone());
//! let outcome = run(
//!     &config,
//!     &fs,
//!     &mut std::io::stdin(),
//!     &mut std::io::stdout(),
//!     &mut std::io::stderr(),
//! )
//! .unwrap();
//! println!("Inputs checked: {}", outcome.checked);
//! println!("Exit code: {}", outcome.exit_status().code());
//! ```

mod config;
mod error;
mod format;
pub mod output;
mod report;
mod strategy;

pub use config::{InputFormat, InvocationConfig, OutputFormat, ReadLimits};
pub use error::{DocumentFormat, ExitStatus, ExtractionError, ValidatorError};
pub use format::Extraction;
pub use report::{Failure, RunOutcome, ValidationResult};
pub use strategy::fs::LocalFs;
pub use strategy::select::select;
pub use strategy::{FileSource, InputSource};

use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use output::StatusWriter;
use strategy::fs::read_bounded;
use strategy::{LITERAL_LABEL, STDIN_LABEL};

/// Validate every input selected by `config`.
///
/// File access goes through `files`; `stdin` is only read when neither a
/// literal nor file patterns are configured. Status lines go to `out` and
/// `err` as described in [`output`].
///
/// A multi-file run stops at the first invalid input; later files are not
/// read or reported. All patterns are resolved up front, so a stop inside
/// the first pattern's files still pays for traversing the later patterns.
///
/// # Errors
///
/// Returns a [`ValidatorError`] (inside the `anyhow::Error`) for ambiguous
/// invocations, I/O failures, extraction failures, invalid glob patterns and
/// oversized inputs. Ambiguity is detected before any file or stream is
/// touched, and every glob pattern is resolved before the first file is read.
/// Any other error comes from writing status lines. Use [`ExitStatus::of`]
/// to classify the error.
pub fn run(
    config: &InvocationConfig,
    files: &dyn FileSource,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<RunOutcome> {
    let source = select(config)?;
    let mut status = StatusWriter::new(config.output, out, err);
    let mut outcome = RunOutcome::default();

    match source {
        InputSource::Files(patterns) => {
            let mut paths: Vec<PathBuf> = Vec::new();
            for pattern in &patterns {
                let resolved = files.resolve(pattern)?;
                debug!(pattern = %pattern, matches = resolved.len(), "pattern resolved");
                paths.extend(resolved);
            }

            for path in &paths {
                let input = path.display().to_string();
                let bytes = files.read(path)?;
                let result = check_input(&config.format, &input, &bytes)?;
                status.write(&input, &result)?;
                outcome.record(&input, &result);
                if outcome.overall_failed {
                    warn!(input = %input, "stopping at first invalid input");
                    break;
                }
            }

            info!(
                checked = outcome.checked,
                valid = outcome.valid,
                skipped = outcome.skipped,
                failed = outcome.overall_failed,
                "run finished"
            );
        }
        InputSource::Literal(text) => {
            let result = check_input(&config.format, LITERAL_LABEL, text.as_bytes())?;
            status.write(LITERAL_LABEL, &result)?;
            outcome.record(LITERAL_LABEL, &result);
        }
        InputSource::Stdin => {
            let bytes = read_bounded(stdin, STDIN_LABEL, config.limits.max_file_size)?;
            let result = check_input(&config.format, STDIN_LABEL, &bytes)?;
            status.write(STDIN_LABEL, &result)?;
            outcome.record(STDIN_LABEL, &result);
        }
    }

    Ok(outcome)
}

/// Extract the query from one input and check it.
fn check_input(
    format: &InputFormat,
    input: &str,
    bytes: &[u8],
) -> Result<ValidationResult, ValidatorError> {
    let extraction = format
        .extract(bytes)
        .map_err(|source| ValidatorError::Extraction {
            input: input.to_owned(),
            source,
        })?;

    let result = match extraction {
        Extraction::Skip => ValidationResult::Skipped,
        Extraction::Extracted(query) => ValidationResult::from(esql_syntax::check(&query)),
    };
    info!(input, status = ?result, "checked");
    Ok(result)
}
