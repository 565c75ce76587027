//! Filesystem input source.
//!
//! Resolves glob patterns to files on disk and reads them for extraction.
//! Properties enforced here:
//! - Traversal starts at the deepest existing ancestor of the pattern, not at
//!   the filesystem root
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Only regular files are returned; directories, devices and pipes are not
//! - Maximum directory depth is enforced
//! - Bounded streaming reads cap memory use at `max_file_size`

use std::io::Read;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ReadLimits;
use crate::error::ValidatorError;
use crate::strategy::FileSource;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// The local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    limits: ReadLimits,
}

impl LocalFs {
    #[must_use]
    pub fn new(limits: ReadLimits) -> Self {
        Self { limits }
    }
}

impl FileSource for LocalFs {
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>, ValidatorError> {
        resolve_glob(pattern, &self.limits)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ValidatorError> {
        read_file_bounded(path, self.limits.max_file_size)
    }
}

/// Where traversal for a pattern starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkRoot {
    pub dir: PathBuf,
    /// The root is the `.` fallback; walked paths are matched and reported
    /// without their leading `./`.
    pub relative_fallback: bool,
}

/// Find the deepest existing ancestor directory of a glob pattern.
///
/// Falls back to the filesystem root for absolute patterns and to `.` for
/// relative ones when no ancestor exists.
#[must_use]
pub fn find_existing_parent(pattern: &str) -> WalkRoot {
    let path = Path::new(pattern);
    let mut parent = path.parent();
    while let Some(candidate) = parent {
        if candidate.as_os_str().is_empty() {
            break;
        }
        if candidate.exists() {
            return WalkRoot {
                dir: candidate.to_path_buf(),
                relative_fallback: false,
            };
        }
        parent = candidate.parent();
    }

    if path.is_absolute()
        && let Some(root) = path.ancestors().last()
    {
        return WalkRoot {
            dir: root.to_path_buf(),
            relative_fallback: false,
        };
    }
    WalkRoot {
        dir: PathBuf::from("."),
        relative_fallback: true,
    }
}

/// How deep below `root` a path matching `pattern` can be. Without `**`
/// every match has exactly as many components as the pattern.
fn walk_depth(pattern: &str, root: &WalkRoot, max_depth: usize) -> usize {
    if pattern.contains("**") {
        return max_depth;
    }
    let pattern_depth = Path::new(pattern).components().count();
    let root_depth = if root.relative_fallback {
        0
    } else {
        root.dir.components().count()
    };
    pattern_depth.saturating_sub(root_depth).min(max_depth)
}

/// Resolve a glob pattern to the regular files (or symlinks to regular
/// files) under its walk root that match it, sorted by traversal order with entries sorted by file name.
///
/// A pattern that matches nothing resolves to an empty list.
///
/// # Errors
///
/// `InvalidPattern` if `pattern` is not a valid glob (checked before any
/// traversal), `Io` if a directory cannot be read.
pub fn resolve_glob(pattern: &str, limits: &ReadLimits) -> Result<Vec<PathBuf>, ValidatorError> {
    let matcher = Pattern::new(pattern).map_err(|source| ValidatorError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let root = find_existing_parent(pattern);
    let depth = walk_depth(pattern, &root, limits.max_depth);
    debug!(pattern, root = %root.dir.display(), depth, "resolving glob");

    let mut files = Vec::new();
    for entry_result in WalkDir::new(&root.dir)
        .follow_links(limits.follow_links)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let entry = entry_result.map_err(|walk_err| {
            let input = walk_err
                .path()
                .map_or_else(|| root.dir.display().to_string(), |p| p.display().to_string());
            ValidatorError::Io {
                input,
                source: walk_err.into(),
            }
        })?;

        // Symlinked files count as files; symlinked directories are only
        // descended into with `follow_links`.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let path = if root.relative_fallback {
            entry.path().strip_prefix(".").unwrap_or(entry.path())
        } else {
            entry.path()
        };

        if matcher.matches_path_with(path, MATCH_OPTIONS) {
            debug!(path = %path.display(), "matched");
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read from `reader` until EOF, failing once more than `max_size` bytes
/// arrive. `input` names the source in errors.
///
/// # Errors
///
/// `Io` on a read failure, `FileTooLarge` past the limit.
pub fn read_bounded(
    reader: &mut dyn Read,
    input: &str,
    max_size: u64,
) -> Result<Vec<u8>, ValidatorError> {
    // Read at most max_size + 1 bytes to detect oversized input
    let mut buffer = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|source| ValidatorError::Io {
            input: input.to_owned(),
            source,
        })?;

    if buffer.len() as u64 > max_size {
        return Err(ValidatorError::FileTooLarge {
            input: input.to_owned(),
            limit: max_size,
        });
    }
    Ok(buffer)
}

/// Open and read a file with [`read_bounded`]. The handle is closed before
/// this returns, on success and on failure.
///
/// # Errors
///
/// `Io` if the file cannot be opened or read, `FileTooLarge` past the limit.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<Vec<u8>, ValidatorError> {
    let input = path.display().to_string();
    let mut file = std::fs::File::open(path).map_err(|source| ValidatorError::Io {
        input: input.clone(),
        source,
    })?;
    read_bounded(&mut file, &input, max_file_size)
}
