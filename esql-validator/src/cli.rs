use clap::{ArgAction, ArgGroup, Parser};
use esql_validator::{InputFormat, InvocationConfig, OutputFormat, ReadLimits};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const AFTER_HELP: &str = "\
Inputs:
  no input, no --files     read from stdin
  <INPUT>                  validate the argument itself
  --files <GLOB>...        validate every matching file
  <INPUT> with --files     rejected as ambiguous

With --json, --toml or --elastic-dr the input (argument, stdin or each file)
is a document and the query is extracted from it first. Detection rules whose
rule.type is not \"esql\" are skipped.";

/// Validate the syntax of ES|QL statements.
#[derive(Debug, Parser)]
#[command(name = "esql-check", version, after_help = AFTER_HELP)]
#[command(group(ArgGroup::new("format").args(["json", "toml", "elastic_dr"])))]
pub struct Cli {
    /// Raw ES|QL, or JSON/TOML/detection rule content with a format flag
    pub input: Option<String>,

    /// Glob pattern(s) selecting files to validate
    #[arg(long, value_name = "GLOB")]
    pub files: Vec<String>,

    /// Validate ES|QL inside the JSON field with the given name
    #[arg(long, value_name = "FIELD")]
    pub json: Option<String>,

    /// Validate ES|QL inside the TOML key with the given (dotted) name
    #[arg(long, value_name = "FIELD")]
    pub toml: Option<String>,

    /// Validate Elastic detection rules (TOML); non-ES|QL rules are skipped
    #[arg(long = "elastic-dr")]
    pub elastic_dr: bool,

    /// Status line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Maximum size of a single input in bytes
    #[arg(
        long,
        value_name = "BYTES",
        env = "ESQL_CHECK_MAX_FILE_SIZE",
        default_value_t = ReadLimits::default().max_file_size
    )]
    pub max_file_size: u64,

    /// Follow symbolic links while resolving --files patterns
    #[arg(long)]
    pub follow_links: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    fn format(&self) -> InputFormat {
        if self.elastic_dr {
            InputFormat::DetectionRule
        } else if let Some(field) = &self.json {
            InputFormat::Json(field.clone())
        } else if let Some(field) = &self.toml {
            InputFormat::Toml(field.clone())
        } else {
            InputFormat::Raw
        }
    }

    pub fn into_config(self) -> InvocationConfig {
        let mut limits = ReadLimits::default();
        limits.max_file_size = self.max_file_size;
        limits.follow_links = self.follow_links;

        let mut config = InvocationConfig::default();
        config.format = self.format();
        config.output = self.output;
        config.limits = limits;
        config.literal_input = self.input;
        config.file_patterns = self.files;
        config
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_literal_defaults_to_raw() {
        let config = parse(&["esql-check", "FROM logs"]).into_config();
        assert_eq!(config.literal_input.as_deref(), Some("FROM logs"));
        assert_eq!(config.format, InputFormat::Raw);
        assert_eq!(config.output, OutputFormat::Text);
        assert!(config.file_patterns.is_empty());
        assert!(!config.limits.follow_links);
    }

    #[test]
    fn test_repeated_files_keep_order() {
        let config = parse(&["esql-check", "--files", "b/*.esql", "--files", "a/*.esql"])
            .into_config();
        assert_eq!(config.file_patterns, vec!["b/*.esql", "a/*.esql"]);
        assert!(config.literal_input.is_none());
    }

    #[test]
    fn test_format_flags() {
        let json = parse(&["esql-check", "--json", "query"]).into_config();
        assert_eq!(json.format, InputFormat::Json("query".to_owned()));

        let toml = parse(&["esql-check", "--toml", "rule.query"]).into_config();
        assert_eq!(toml.format, InputFormat::Toml("rule.query".to_owned()));

        let rule = parse(&["esql-check", "--elastic-dr", "--files", "*.toml"]).into_config();
        assert_eq!(rule.format, InputFormat::DetectionRule);
    }

    #[test]
    fn test_format_flags_are_exclusive() {
        let err = Cli::try_parse_from(["esql-check", "--json", "q", "--elastic-dr"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["esql-check", "--json", "q", "--toml", "q"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_literal_with_files_parses_and_is_rejected_later() {
        // Ambiguity is a run-time UsageError, not a decoding error.
        let config = parse(&["esql-check", "FROM a", "--files", "*.esql"]).into_config();
        assert!(matches!(
            esql_validator::select(&config),
            Err(esql_validator::ValidatorError::AmbiguousInvocation { .. })
        ));
    }

    #[test]
    fn test_limits_and_output() {
        let config = parse(&[
            "esql-check",
            "--output",
            "json",
            "--max-file-size",
            "128",
            "--follow-links",
            "-vv",
        ]);
        assert_eq!(config.verbose, 2);
        let config = config.into_config();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.limits.max_file_size, 128);
        assert!(config.limits.follow_links);
    }
}
