//! Configuration types for a validation run.
//!
//! `InvocationConfig` is resolved once from the command line and never
//! mutated afterwards. Read limits live in their own struct so the filesystem
//! strategy does not need the rest of the invocation.

/// How candidate ES|QL text is extracted from each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputFormat {
    /// The whole input is the query.
    #[default]
    Raw,
    /// The query is the value of this field in a JSON document.
    Json(String),
    /// The query is the value of this (dotted) key in a TOML document.
    Toml(String),
    /// The input is a TOML detection rule; only `rule.type = "esql"` rules
    /// carry a query.
    DetectionRule,
}

/// Format of the per-input status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per input.
    #[default]
    Text,
    /// One JSON object per input.
    Json,
}

/// Bounds applied to file discovery and reads.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ReadLimits {
    /// Maximum size in bytes of a single input (default: 10 MiB).
    pub max_file_size: u64,
    /// Whether glob traversal follows symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth below the resolution root (default: 64).
    pub max_depth: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}

/// Everything a run needs to know, decoded from the command line.
///
/// At most one of `literal_input` and `file_patterns` may be set; when neither
/// is, the query is read from stdin.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct InvocationConfig {
    /// Positional argument: query text or document content.
    pub literal_input: Option<String>,
    /// `--files` patterns, in command-line order.
    pub file_patterns: Vec<String>,
    pub format: InputFormat,
    pub output: OutputFormat,
    pub limits: ReadLimits,
}
