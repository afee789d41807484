//! Lexical helpers for glob-like path patterns.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '(', ')', '!', '+', '@'];

pub fn is_glob_pattern(value: &str) -> bool {
    value.contains(GLOB_META)
}

/// Trim, use forward slashes, and drop one leading `./`.
pub fn normalize_glob_value(value: &str) -> String {
    let value = value.trim().replace('\\', "/");
    match value.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => value,
    }
}

pub(crate) fn trim_trailing_slashes(value: &str) -> &str {
    value.trim_end_matches('/')
}

/// Leading path segments of `value` up to the first segment with glob syntax.
pub fn pattern_prefix(value: &str) -> String {
    let normalized = normalize_glob_value(value);
    normalized
        .split('/')
        .filter(|segment| !segment.is_empty())
        .take_while(|segment| !is_glob_pattern(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Textual overlap test: equal patterns, or one literal prefix nested under the other.
///
/// Deliberately not a glob-intersection test. Patterns that only overlap through
/// differing brace expansions are reported as disjoint.
pub fn patterns_overlap_by_prefix(left: &str, right: &str) -> bool {
    if left == right {
        return true;
    }

    let left_prefix = pattern_prefix(left);
    let right_prefix = pattern_prefix(right);
    if left_prefix.is_empty() || right_prefix.is_empty() {
        return false;
    }

    left_prefix == right_prefix
        || left_prefix.starts_with(&format!("{right_prefix}/"))
        || right_prefix.starts_with(&format!("{left_prefix}/"))
}

/// Resolve `.` and `..` without touching the filesystem.
pub(crate) fn lexical_normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_str()),
        }
    }
    out
}

/// `path` relative to `base`, forward-slash separated, `..` where `path` escapes `base`.
///
/// Both arguments should be absolute or both relative to the same directory.
pub fn relative_path(path: &Utf8Path, base: &Utf8Path) -> String {
    let path = lexical_normalize(path);
    let base = lexical_normalize(base);
    let path_parts: Vec<&str> = path.components().map(|c| c.as_str()).collect();
    let base_parts: Vec<&str> = base.components().map(|c| c.as_str()).collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", base_parts.len() - common).collect();
    parts.extend(&path_parts[common..]);
    parts.join("/")
}

/// Re-express `pattern`, declared relative to `base_dir`, relative to `cwd`.
///
/// Returns an empty string for a blank pattern and `.` for `cwd` itself.
pub fn rebase_pattern(pattern: &str, base_dir: &Utf8Path, cwd: &Utf8Path) -> String {
    let normalized = normalize_glob_value(pattern);
    if normalized.is_empty() {
        return String::new();
    }

    let candidate = Utf8Path::new(&normalized);
    let absolute = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    };

    let relative = relative_path(&absolute, cwd);
    if relative.is_empty() {
        return ".".to_string();
    }
    normalize_glob_value(&relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("src/**"));
        assert!(is_glob_pattern("*.{ts,js}"));
        assert!(is_glob_pattern("lib/?.sh"));
        assert!(!is_glob_pattern("src/lib.ts"));
        assert!(!is_glob_pattern("scripts"));
    }

    #[test]
    fn normalize_strips_one_dot_slash_and_backslashes() {
        assert_eq!(normalize_glob_value("  ./src/a  "), "src/a");
        assert_eq!(normalize_glob_value(".\\src\\a"), "src/a");
        assert_eq!(normalize_glob_value("././x"), "./x");
    }

    #[test]
    fn prefix_stops_at_first_glob_segment() {
        assert_eq!(pattern_prefix("a/scripts/**"), "a/scripts");
        assert_eq!(pattern_prefix("src/**/*.{js,ts}"), "src");
        assert_eq!(pattern_prefix("**/*.ts"), "");
        assert_eq!(pattern_prefix("./docs/guide.md"), "docs/guide.md");
    }

    #[test]
    fn overlap_is_prefix_nesting() {
        assert!(patterns_overlap_by_prefix("src/**", "src/a/**"));
        assert!(patterns_overlap_by_prefix("a/scripts/**", "a/scripts"));
        assert!(patterns_overlap_by_prefix("**", "**"));
        assert!(!patterns_overlap_by_prefix("a/scripts/**", "b/**/*.ts"));
        assert!(!patterns_overlap_by_prefix("src2/**", "src/**"));
        assert!(!patterns_overlap_by_prefix("**/*.ts", "src/**"));
    }

    #[test]
    fn brace_variants_are_not_intersected() {
        assert!(!patterns_overlap_by_prefix("{a,b}/**", "a/**"));
    }

    #[test]
    fn lexical_normalize_resolves_dots() {
        assert_eq!(lexical_normalize(Utf8Path::new("/r/a/./b/../c")), "/r/a/c");
        assert_eq!(lexical_normalize(Utf8Path::new("../x/./y")), "../x/y");
        assert_eq!(lexical_normalize(Utf8Path::new("/..")), "/");
    }

    #[test]
    fn relative_path_walks_up_when_needed() {
        assert_eq!(
            relative_path(Utf8Path::new("/r/pkg/src"), Utf8Path::new("/r")),
            "pkg/src"
        );
        assert_eq!(
            relative_path(Utf8Path::new("/r/other"), Utf8Path::new("/r/pkg")),
            "../other"
        );
        assert_eq!(relative_path(Utf8Path::new("/r"), Utf8Path::new("/r")), "");
        assert_eq!(
            relative_path(Utf8Path::new("./src/a.sh"), Utf8Path::new(".")),
            "src/a.sh"
        );
    }

    #[test]
    fn rebase_moves_patterns_between_directories() {
        let cwd = Utf8Path::new("/repo");
        assert_eq!(
            rebase_pattern("./src/**/*", Utf8Path::new("/repo/packages/a"), cwd),
            "packages/a/src/**/*"
        );
        assert_eq!(rebase_pattern("src", cwd, cwd), "src");
        assert_eq!(rebase_pattern(".", cwd, cwd), ".");
        assert_eq!(rebase_pattern("   ", cwd, cwd), "");
        assert_eq!(
            rebase_pattern("/repo/tests/**", Utf8Path::new("/elsewhere"), cwd),
            "tests/**"
        );
        assert_eq!(
            rebase_pattern("../shared/**", Utf8Path::new("/repo/app"), cwd),
            "shared/**"
        );
    }
}
