//! Scope resolution for polylint domains.
//!
//! Two pieces live here:
//! - the scope pattern resolver, which folds any number of per-package project descriptors
//!   (tsconfig-style include/exclude lists) plus a force-include override into one
//!   deterministic `(files, ignore)` pair;
//! - the file scope walker, which turns glob-like patterns into concrete, root-relative files.
//!
//! Pattern arithmetic is purely lexical. Only the descriptor loader and the walker touch disk.

mod descriptor;
mod error;
mod pattern;
mod resolver;
mod walker;

pub use descriptor::{load_project_descriptor, load_project_descriptors};
pub use error::ScopeError;
pub use pattern::{
    is_glob_pattern, normalize_glob_value, pattern_prefix, patterns_overlap_by_prefix,
    rebase_pattern, relative_path,
};
pub use resolver::{
    DEFAULT_IGNORE_PATTERNS, ProjectDescriptor, SOURCE_EXTENSIONS, ScopeResolver, extension_glob,
};
pub use walker::{NOISE_DIR_NAMES, resolve_files_from_patterns, resolve_search_roots};

pub use polylint_types::ScopePatterns;
