//! File scope walker: glob-like patterns -> concrete root-relative files.

use crate::error::ScopeError;
use crate::pattern::{is_glob_pattern, normalize_glob_value, pattern_prefix, relative_path};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Directory names never descended into.
pub const NOISE_DIR_NAMES: &[&str] = &[".git", "node_modules", "dist"];

/// Resolve `patterns` under `root` to existing files with one of `extensions`.
///
/// - a literal path to an existing file is taken as is, whatever its extension;
/// - a literal path to a directory is walked recursively;
/// - a glob is walked from its literal prefix and each candidate matched against the
///   whole pattern (`*` stays within one segment, dot-files match).
///
/// Output is sorted, deduplicated, relative to `root`, forward-slash separated.
pub fn resolve_files_from_patterns(
    root: &Utf8Path,
    patterns: &[String],
    extensions: &[&str],
) -> Result<Vec<String>, ScopeError> {
    let walker = ExtensionWalker::new(extensions);
    let mut matched: BTreeSet<String> = BTreeSet::new();

    for raw in patterns {
        let pattern = normalize_glob_value(raw);
        if pattern.is_empty() {
            continue;
        }

        if !is_glob_pattern(&pattern) {
            let target = root.join(&pattern);
            if target.is_file() {
                matched.insert(relative_path(&target, root));
            } else if target.is_dir() {
                for file in walker.collect(&target) {
                    matched.insert(relative_path(&file, root));
                }
            } else {
                trace!(pattern = %pattern, "literal pattern does not exist");
            }
            continue;
        }

        let relative_pattern = if Utf8Path::new(&pattern).is_absolute() {
            relative_path(Utf8Path::new(&pattern), root)
        } else {
            pattern.clone()
        };
        let matcher = compile_matcher(&relative_pattern)?;
        let search_root = root.join(pattern_prefix(&relative_pattern));
        if !search_root.exists() {
            trace!(pattern = %pattern, search_root = %search_root, "search root does not exist");
            continue;
        }

        for file in walker.collect(&search_root) {
            let rel = relative_path(&file, root);
            if matcher.is_match(&rel) {
                matched.insert(rel);
            }
        }
    }

    debug!(patterns = patterns.len(), files = matched.len(), "resolved file scope");
    Ok(matched.into_iter().collect())
}

/// Existing search roots for `patterns`: the pattern itself when literal, else its literal prefix.
pub fn resolve_search_roots(root: &Utf8Path, patterns: &[String]) -> Vec<Utf8PathBuf> {
    patterns
        .iter()
        .map(|raw| normalize_glob_value(raw))
        .filter(|p| !p.is_empty())
        .map(|p| {
            if is_glob_pattern(&p) {
                root.join(pattern_prefix(&p))
            } else {
                root.join(p)
            }
        })
        .filter(|p| p.exists())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn compile_matcher(pattern: &str) -> Result<GlobMatcher, ScopeError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ScopeError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

struct ExtensionWalker {
    extensions: BTreeSet<String>,
}

impl ExtensionWalker {
    fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn matches_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Every extension-matching file under `start`; unreadable entries are skipped.
    fn collect(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        WalkDir::new(start)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| NOISE_DIR_NAMES.contains(&name)))
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
            .filter(|path| self.matches_extension(path))
            .collect()
    }
}
