// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: run-terminating errors are reported on stderr.
// - unwrap_used/expect_used: only the CLI tests unwrap parse results.
#![allow(clippy::print_stderr, clippy::unwrap_used, clippy::expect_used)]

mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use esql_validator::{ExitStatus, LocalFs, run};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_tracing(cli.verbose);
    let config = cli.into_config();
    let fs = LocalFs::new(config.limits.clone());

    let result = run(
        &config,
        &fs,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    let status = match result {
        Ok(outcome) => outcome.exit_status(),
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitStatus::of(&err)
        }
    };
    ExitCode::from(status.code())
}
