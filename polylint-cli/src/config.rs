//! Configuration file loading for polylint.
//!
//! Discovers and loads `polylint.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use polylint_scope::is_glob_pattern;
use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "polylint.toml";

/// The only `version` this build understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// Flat config files probed by `--user-config`, in order.
pub const ESLINT_CONFIG_NAMES: &[&str] = &[
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
    "eslint.config.ts",
];

const FALLBACK_PROJECT_CONFIG: &str = "tsconfig.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {path}: missing `version` (expected {SUPPORTED_VERSION})")]
    MissingVersion { path: Utf8PathBuf },

    #[error("config file {path}: unsupported version {found} (expected {SUPPORTED_VERSION})")]
    UnsupportedVersion { path: Utf8PathBuf, found: u32 },

    #[error("invalid project-configs pattern `{pattern}`: {message}")]
    ProjectConfigPattern { pattern: String, message: String },
}

impl ConfigError {
    /// Process exit code for configuration failures.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Top-level configuration from polylint.toml.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolylintConfig {
    /// Schema version; required when the file exists.
    pub version: Option<u32>,

    /// Project root for descriptor and force-include resolution, relative to the repo root.
    pub root: Option<Utf8PathBuf>,

    pub domains: DomainsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct DomainsConfig {
    pub source_lint: SourceLintConfig,
    pub prose_format: ProseFormatConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceLintConfig {
    /// tsconfig-style project descriptors; glob patterns allowed.
    pub project_configs: Vec<String>,

    /// Patterns that win over any descriptor exclude.
    pub force_include: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProseFormatConfig {
    pub prettier_config: Option<Utf8PathBuf>,
}

/// Discover the polylint.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load, parse and version-check a polylint.toml config file.
pub fn load_config(path: &Utf8Path) -> Result<PolylintConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match config.version {
        None => Err(ConfigError::MissingVersion {
            path: path.to_path_buf(),
        }),
        Some(SUPPORTED_VERSION) => Ok(config),
        Some(found) => Err(ConfigError::UnsupportedVersion {
            path: path.to_path_buf(),
            found,
        }),
    }
}

/// Parse a config file from a string. Does not check `version`.
pub fn parse_config(contents: &str) -> Result<PolylintConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> Result<PolylintConfig, ConfigError> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(PolylintConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    pub root: Option<Utf8PathBuf>,

    /// Project config entries (from config file, extended by CLI).
    pub project_configs: Vec<String>,

    /// Force-include patterns (from config file, extended by CLI).
    pub force_include: Vec<String>,

    /// Prettier config (CLI overrides config file).
    pub prettier_config: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PolylintConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: PolylintConfig) -> Self {
        Self { config }
    }

    /// CLI lists extend the config file lists; a CLI prettier config replaces the file's.
    pub fn merge_cli_args(
        self,
        cli_project_configs: &[String],
        cli_force_include: &[String],
        cli_prettier_config: Option<&Utf8Path>,
    ) -> MergedConfig {
        let source_lint = self.config.domains.source_lint;
        let mut project_configs = source_lint.project_configs;
        let mut force_include = source_lint.force_include;

        for entry in cli_project_configs {
            if !project_configs.contains(entry) {
                project_configs.push(entry.clone());
            }
        }
        for pattern in cli_force_include {
            if !force_include.contains(pattern) {
                force_include.push(pattern.clone());
            }
        }

        MergedConfig {
            root: self.config.root,
            project_configs,
            force_include,
            prettier_config: cli_prettier_config
                .map(Utf8Path::to_path_buf)
                .or(self.config.domains.prose_format.prettier_config),
        }
    }
}

/// Config with every path made absolute and every glob expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub root: Utf8PathBuf,
    /// Existing descriptor files, sorted and deduplicated.
    pub project_configs: Vec<Utf8PathBuf>,
    /// Relative to `root`, leading `./` stripped.
    pub force_include: Vec<String>,
    pub prettier_config: Option<Utf8PathBuf>,
}

impl MergedConfig {
    /// Resolve against `repo_root` (the directory holding polylint.toml).
    pub fn resolve(&self, repo_root: &Utf8Path) -> Result<ResolvedConfig, ConfigError> {
        let root = match &self.root {
            Some(r) => absolutize(repo_root, r),
            None => repo_root.to_path_buf(),
        };

        let mut found: BTreeSet<Utf8PathBuf> = BTreeSet::new();
        for entry in &self.project_configs {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if is_glob_pattern(entry) {
                let pattern = if Utf8Path::new(entry).is_absolute() {
                    entry.to_string()
                } else {
                    format!("{}/{}", glob::Pattern::escape(root.as_str()), entry)
                };
                found.extend(expand_glob(&pattern)?);
                continue;
            }
            let candidate = absolutize(&root, Utf8Path::new(entry));
            if candidate.is_file() {
                found.insert(candidate);
            } else {
                warn!(path = %candidate, "project config does not exist; ignored");
            }
        }
        if found.is_empty() {
            let fallback = root.join(FALLBACK_PROJECT_CONFIG);
            if fallback.is_file() {
                debug!(path = %fallback, "using fallback project config");
                found.insert(fallback);
            }
        }

        let force_include = self
            .force_include
            .iter()
            .map(|p| p.trim())
            .map(|p| p.strip_prefix("./").unwrap_or(p).to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(ResolvedConfig {
            project_configs: found.into_iter().collect(),
            force_include,
            prettier_config: self
                .prettier_config
                .as_deref()
                .map(|p| absolutize(repo_root, p)),
            root,
        })
    }
}

fn absolutize(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn expand_glob(pattern: &str) -> Result<Vec<Utf8PathBuf>, ConfigError> {
    let paths = glob::glob(pattern).map_err(|e| ConfigError::ProjectConfigPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .filter_map(|p| Utf8PathBuf::from_path_buf(p).ok())
        .collect())
}

/// Source-lint config override chosen from `--source-lint-config` / `--user-config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintConfigChoice {
    pub chosen: Option<Utf8PathBuf>,
    /// False when an explicit path was given but does not exist.
    pub is_valid: bool,
}

/// An explicit path wins over `--user-config` discovery.
pub fn choose_source_lint_config(
    root: &Utf8Path,
    cwd: &Utf8Path,
    explicit: Option<&Utf8Path>,
    user_config: bool,
) -> LintConfigChoice {
    if let Some(path) = explicit {
        let path = absolutize(cwd, path);
        let is_valid = path.is_file();
        if !is_valid {
            warn!(path = %path, "--source-lint-config does not exist");
        }
        return LintConfigChoice {
            chosen: Some(path),
            is_valid,
        };
    }

    if user_config {
        let found = ESLINT_CONFIG_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file());
        match &found {
            Some(path) => debug!(path = %path, "using repository ESLint config"),
            None => warn!("--user-config given but no eslint.config.* found in {}", root),
        }
        return LintConfigChoice {
            chosen: found,
            is_valid: true,
        };
    }

    LintConfigChoice {
        chosen: None,
        is_valid: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8")
    }

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
version = 1
root = "."

[domains.source-lint]
project-configs = ["tsconfig.json", "packages/*/tsconfig.json"]
force-include = ["./scripts"]

[domains.prose-format]
prettier-config = ".prettierrc.json"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.version, Some(1));
        assert_eq!(config.domains.source_lint.project_configs.len(), 2);
        assert_eq!(config.domains.source_lint.force_include, vec!["./scripts"]);
        assert_eq!(
            config.domains.prose_format.prettier_config,
            Some(Utf8PathBuf::from(".prettierrc.json"))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PolylintConfig::default());
    }

    #[test]
    fn test_version_is_required_and_checked() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        let path = root.join(CONFIG_FILE_NAME);

        std::fs::write(&path, "root = \".\"\n").expect("write");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::MissingVersion { .. })
        ));

        std::fs::write(&path, "version = 2\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported version 2"));
        assert_eq!(err.exit_code(), 1);

        std::fs::write(&path, "version = 1\n").expect("write");
        assert!(load_config(&path).is_ok());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = TempDir::new().expect("temp dir");
        let path = utf8_root(&temp).join(CONFIG_FILE_NAME);
        std::fs::write(&path, "version = [").expect("write");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_merge_cli_extends_lists_and_overrides_prettier() {
        let config = PolylintConfig {
            version: Some(1),
            domains: DomainsConfig {
                source_lint: SourceLintConfig {
                    project_configs: vec!["tsconfig.json".to_string()],
                    force_include: vec!["scripts".to_string()],
                },
                prose_format: ProseFormatConfig {
                    prettier_config: Some(".prettierrc".into()),
                },
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_cli_args(
            &["tsconfig.json".to_string(), "web/tsconfig.json".to_string()],
            &["tools".to_string()],
            Some(Utf8Path::new("cli.prettierrc")),
        );

        assert_eq!(merged.project_configs, vec!["tsconfig.json", "web/tsconfig.json"]);
        assert_eq!(merged.force_include, vec!["scripts", "tools"]);
        assert_eq!(merged.prettier_config, Some("cli.prettierrc".into()));
    }

    #[test]
    fn test_resolve_expands_globs_and_falls_back() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        for pkg in ["b", "a"] {
            std::fs::create_dir_all(root.join("packages").join(pkg)).expect("mkdir");
            std::fs::write(root.join("packages").join(pkg).join("tsconfig.json"), "{}")
                .expect("write");
        }

        let merged = MergedConfig {
            project_configs: vec![
                "packages/*/tsconfig.json".to_string(),
                "packages/a/tsconfig.json".to_string(),
                "missing.json".to_string(),
            ],
            force_include: vec!["./scripts".to_string(), " ".to_string()],
            ..Default::default()
        };
        let resolved = merged.resolve(&root).expect("resolve");
        assert_eq!(
            resolved.project_configs,
            vec![
                root.join("packages/a/tsconfig.json"),
                root.join("packages/b/tsconfig.json"),
            ]
        );
        assert_eq!(resolved.force_include, vec!["scripts"]);

        std::fs::write(root.join("tsconfig.json"), "{}").expect("write");
        let fallback = MergedConfig::default().resolve(&root).expect("resolve");
        assert_eq!(fallback.project_configs, vec![root.join("tsconfig.json")]);
    }

    #[test]
    fn test_resolve_nested_root() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        std::fs::create_dir_all(root.join("app")).expect("mkdir");
        std::fs::write(root.join("app/tsconfig.json"), "{}").expect("write");

        let merged = MergedConfig {
            root: Some("app".into()),
            prettier_config: Some(".prettierrc".into()),
            ..Default::default()
        };
        let resolved = merged.resolve(&root).expect("resolve");
        assert_eq!(resolved.root, root.join("app"));
        assert_eq!(resolved.project_configs, vec![root.join("app/tsconfig.json")]);
        assert_eq!(resolved.prettier_config, Some(root.join(".prettierrc")));
    }

    #[test]
    fn test_choose_source_lint_config() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);

        let missing = choose_source_lint_config(&root, &root, Some(Utf8Path::new("nope.js")), true);
        assert_eq!(missing.chosen, Some(root.join("nope.js")));
        assert!(!missing.is_valid);

        let none = choose_source_lint_config(&root, &root, None, true);
        assert_eq!(none, LintConfigChoice { chosen: None, is_valid: true });

        std::fs::write(root.join("eslint.config.mjs"), "").expect("write");
        let discovered = choose_source_lint_config(&root, &root, None, true);
        assert_eq!(discovered.chosen, Some(root.join("eslint.config.mjs")));

        let ignored = choose_source_lint_config(&root, &root, None, false);
        assert_eq!(ignored.chosen, None);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "version = 1\n").expect("write config");
        assert!(discover_config(&root).is_some());
        assert_eq!(load_or_default(&root).expect("load").version, Some(1));
    }
}
