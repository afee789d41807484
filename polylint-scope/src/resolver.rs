//! Scope pattern resolver: many project descriptors + force-include -> one `ScopePatterns`.

use crate::pattern::{
    is_glob_pattern, normalize_glob_value, patterns_overlap_by_prefix, rebase_pattern,
    trim_trailing_slashes,
};
use camino::{Utf8Path, Utf8PathBuf};
use polylint_types::ScopePatterns;
use std::collections::BTreeSet;
use tracing::debug;

/// Extensions the source-lint domain checks.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "tsx", "mts", "cts", "json"];

/// Ignore set contributed by a descriptor that declares no excludes.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] =
    &["node_modules/**", "bower_components/**", "jspm_packages/**"];

/// One package's declared file scope (e.g. a `tsconfig.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Directory the include/exclude patterns are relative to.
    pub base_dir: Utf8PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ProjectDescriptor {
    pub fn new(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// `.{js,ts,...}` suffix appended to extensionless include patterns.
pub fn extension_glob(extensions: &[&str]) -> String {
    format!(".{{{}}}", extensions.join(","))
}

/// Resolves descriptors into patterns relative to a single common root.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    cwd: Utf8PathBuf,
    extension_glob: String,
}

impl ScopeResolver {
    pub fn new(cwd: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            extension_glob: extension_glob(SOURCE_EXTENSIONS),
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extension_glob = extension_glob(extensions);
        self
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Resolve `descriptors` and `force_include` (declared relative to `force_include_base`).
    ///
    /// Pure and deterministic: the result does not depend on descriptor order.
    pub fn resolve(
        &self,
        descriptors: &[ProjectDescriptor],
        force_include: &[String],
        force_include_base: &Utf8Path,
    ) -> ScopePatterns {
        let force_rebased: Vec<String> = force_include
            .iter()
            .map(|p| rebase_pattern(p, force_include_base, &self.cwd))
            .collect();
        let force_normalized = self.normalize_include_patterns(&force_rebased);
        let force_raw = normalize_exclude_patterns(&force_rebased);

        let mut includes_by_descriptor: Vec<Vec<String>> = Vec::with_capacity(descriptors.len());
        let mut excludes_by_descriptor: Vec<Vec<String>> = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let rebased_include: Vec<String> = descriptor
                .include
                .iter()
                .map(|p| rebase_pattern(p, &descriptor.base_dir, &self.cwd))
                .collect();
            let include = if rebased_include.is_empty() {
                vec![rebase_pattern("**/*", &descriptor.base_dir, &self.cwd)]
            } else {
                rebased_include
            };
            let exclude: Vec<String> = descriptor
                .exclude
                .iter()
                .map(|p| rebase_pattern(p, &descriptor.base_dir, &self.cwd))
                .collect();

            includes_by_descriptor.push(self.normalize_include_patterns(&include));
            excludes_by_descriptor.push(normalize_exclude_patterns(&exclude));
        }

        let files: BTreeSet<String> = includes_by_descriptor
            .iter()
            .flatten()
            .chain(&force_normalized)
            .cloned()
            .collect();

        let mut ignore_candidates: BTreeSet<String> = BTreeSet::new();
        for (index, excludes) in excludes_by_descriptor.iter().enumerate() {
            if excludes.is_empty() {
                ignore_candidates.extend(DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()));
                continue;
            }

            for exclude in excludes {
                let wanted_by_sibling = includes_by_descriptor
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .flat_map(|(_, includes)| includes)
                    .any(|include| patterns_overlap_by_prefix(include, exclude));

                if wanted_by_sibling {
                    debug!(exclude = %exclude, "exclude overlaps a sibling descriptor include; dropped");
                } else {
                    ignore_candidates.insert(exclude.clone());
                }
            }
        }

        let ignore: Vec<String> = ignore_candidates
            .into_iter()
            .filter(|ignore| {
                let forced = force_normalized
                    .iter()
                    .chain(&force_raw)
                    .any(|fi| patterns_overlap_by_prefix(ignore, fi));
                if forced {
                    debug!(ignore = %ignore, "ignore pattern overridden by force-include");
                }
                !forced && !files.contains(ignore)
            })
            .collect();

        ScopePatterns {
            files: files.into_iter().collect(),
            ignore,
        }
    }

    /// Expand each pattern to a source-file glob, then dedupe and sort.
    pub fn normalize_include_patterns(&self, values: &[String]) -> Vec<String> {
        values
            .iter()
            .map(|v| self.expand_extensionless_pattern(v))
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `src` -> `src/**/*.{exts}`; a pattern whose last segment names an extension is kept as is.
    pub fn expand_extensionless_pattern(&self, value: &str) -> String {
        let normalized = normalize_glob_value(value);
        let normalized = trim_trailing_slashes(&normalized);
        let ext = &self.extension_glob;

        if normalized.is_empty() || has_extension(normalized) {
            return normalized.to_string();
        }
        if !is_glob_pattern(normalized) {
            return format!("{normalized}/**/*{ext}");
        }
        if normalized == "**" {
            return format!("**/*{ext}");
        }
        if normalized.ends_with("/**") {
            return format!("{normalized}/*{ext}");
        }
        format!("{normalized}{ext}")
    }
}

fn has_extension(value: &str) -> bool {
    value.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

fn normalize_exclude_patterns(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| trim_trailing_slashes(&normalize_glob_value(v)).to_string())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> ScopeResolver {
        ScopeResolver::new("/repo")
    }

    #[test]
    fn extensionless_directory_gets_recursive_glob() {
        assert_eq!(
            resolver().expand_extensionless_pattern("src/"),
            "src/**/*.{js,mjs,cjs,jsx,ts,tsx,mts,cts,json}"
        );
    }

    #[test]
    fn globstar_variants() {
        let r = ScopeResolver::new("/repo").with_extensions(&["ts"]);
        assert_eq!(r.expand_extensionless_pattern("**"), "**/*.{ts}");
        assert_eq!(r.expand_extensionless_pattern("a/**"), "a/**/*.{ts}");
        assert_eq!(r.expand_extensionless_pattern("src/**/*"), "src/**/*.{ts}");
    }

    #[test]
    fn named_extension_is_never_expanded_twice() {
        let r = resolver();
        assert_eq!(r.expand_extensionless_pattern("src/**/*.tsx"), "src/**/*.tsx");
        let once = r.expand_extensionless_pattern("lib");
        assert_eq!(r.expand_extensionless_pattern(&once), once);
    }

    #[test]
    fn empty_include_defaults_to_everything_under_base() {
        let descriptors = vec![ProjectDescriptor::new("/repo/pkg")];
        let scope = resolver().resolve(&descriptors, &[], Utf8Path::new("/repo"));
        assert_eq!(
            scope.files,
            vec!["pkg/**/*.{js,mjs,cjs,jsx,ts,tsx,mts,cts,json}".to_string()]
        );
        assert_eq!(
            scope.ignore,
            vec![
                "bower_components/**".to_string(),
                "jspm_packages/**".to_string(),
                "node_modules/**".to_string(),
            ]
        );
    }

    #[test]
    fn sibling_include_rescues_exclude() {
        let descriptors = vec![
            ProjectDescriptor::new("/repo")
                .with_include(["src/**"])
                .with_exclude(["src/generated/**", "tmp"]),
            ProjectDescriptor::new("/repo")
                .with_include(["src/generated/**"])
                .with_exclude(["dist"]),
        ];
        let scope = resolver().resolve(&descriptors, &[], Utf8Path::new("/repo"));
        assert_eq!(scope.ignore, vec!["dist".to_string(), "tmp".to_string()]);
    }

    #[test]
    fn exclude_not_rescued_by_own_include() {
        let descriptors = vec![
            ProjectDescriptor::new("/repo")
                .with_include(["src/**"])
                .with_exclude(["src/vendor/**"]),
        ];
        let scope = resolver().resolve(&descriptors, &[], Utf8Path::new("/repo"));
        assert_eq!(scope.ignore, vec!["src/vendor/**".to_string()]);
    }

    #[test]
    fn force_include_is_rebased_from_its_own_base() {
        let descriptors = vec![ProjectDescriptor::new("/repo").with_include(["src"])];
        let scope = resolver().resolve(
            &descriptors,
            &["./tools".to_string()],
            Utf8Path::new("/repo/config"),
        );
        assert!(
            scope
                .files
                .contains(&"config/tools/**/*.{js,mjs,cjs,jsx,ts,tsx,mts,cts,json}".to_string())
        );
    }

    #[test]
    fn force_include_beats_default_ignore() {
        let descriptors = vec![ProjectDescriptor::new("/repo").with_include(["src"])];
        let scope = resolver().resolve(
            &descriptors,
            &["node_modules/patched-pkg".to_string()],
            Utf8Path::new("/repo"),
        );
        assert!(!scope.ignore.contains(&"node_modules/**".to_string()));
        assert!(scope.ignore.contains(&"bower_components/**".to_string()));
    }

    #[test]
    fn ignore_never_repeats_a_files_pattern() {
        let descriptors = vec![
            ProjectDescriptor::new("/repo")
                .with_include(["src/index.ts"])
                .with_exclude(["src/index.ts"]),
        ];
        let scope = resolver().resolve(&descriptors, &[], Utf8Path::new("/repo"));
        assert_eq!(scope.files, vec!["src/index.ts".to_string()]);
        assert!(scope.ignore.is_empty());
    }

    #[test]
    fn no_descriptors_and_no_force_include_is_empty() {
        let scope = resolver().resolve(&[], &[], Utf8Path::new("/repo"));
        assert!(scope.is_empty());
        assert!(scope.ignore.is_empty());
    }
}
