//! Library half of the `polylint` binary: argument model, config loading, rendering and the
//! top-level run loop. `main.rs` only parses, sets up logging and maps the outcome to an exit code.

pub mod config;
pub mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, ValueEnum};
use config::{ConfigMerger, ResolvedConfig, choose_source_lint_config};
use fs_err as fs;
use polylint_domain::{
    BuiltinSettings, ExecutionContext, SelectionRequest, SystemCommandPort, TracingLogSink,
    builtin_registry, evaluate_domains, resolve_domain_selection, run_decisions,
};
use polylint_types::Domain;
use std::collections::BTreeMap;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "polylint",
    version,
    about = "Decide which lint domains apply, run them, and aggregate the result."
)]
pub struct Cli {
    /// Apply fixes where the underlying tool supports it.
    #[arg(long, default_value_t = false)]
    pub fix: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project root (default: current directory).
    #[arg(long, default_value = ".")]
    pub root: Utf8PathBuf,

    /// Run only these domains.
    #[arg(long = "domain", value_name = "DOMAIN", num_args = 1..)]
    pub domains: Vec<Domain>,

    /// Never run these domains.
    #[arg(long = "skip-domain", value_name = "DOMAIN", num_args = 1..)]
    pub skip_domains: Vec<Domain>,

    /// Explicit source-lint targets (files, directories or globs).
    #[arg(long = "source-lint", value_name = "PATTERN", num_args = 1..)]
    pub source_lint: Vec<String>,

    /// Explicit shell-lint targets.
    #[arg(long = "shell-lint", value_name = "PATTERN", num_args = 1..)]
    pub shell_lint: Vec<String>,

    /// Explicit prose-format targets.
    #[arg(long = "prose-format", value_name = "PATTERN", num_args = 1..)]
    pub prose_format: Vec<String>,

    /// Explicit config-format targets.
    #[arg(long = "config-format", value_name = "PATTERN", num_args = 1..)]
    pub config_format: Vec<String>,

    /// ESLint config to use instead of the one ESLint would discover.
    #[arg(long, value_name = "PATH")]
    pub source_lint_config: Option<Utf8PathBuf>,

    /// Use the repository's own eslint.config.{js,mjs,cjs,ts}.
    #[arg(long, default_value_t = false)]
    pub user_config: bool,

    /// Extra project descriptors (relative to the configured root; globs allowed).
    #[arg(long = "project-config", value_name = "PATH")]
    pub project_configs: Vec<String>,

    /// Extra force-include patterns (relative to the configured root).
    #[arg(long = "force-include", value_name = "PATTERN")]
    pub force_include: Vec<String>,

    /// Prettier config for prose-format (overrides polylint.toml).
    #[arg(long, value_name = "PATH")]
    pub prettier_config: Option<Utf8PathBuf>,

    /// List registered domains and exit.
    #[arg(long, default_value_t = false, conflicts_with = "explain")]
    pub list_domains: bool,

    /// Print the decision for every domain without running anything.
    #[arg(long, default_value_t = false)]
    pub explain: bool,

    /// Output format for --list-domains and --explain.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn targets(&self) -> BTreeMap<Domain, Vec<String>> {
        [
            (Domain::SourceLint, &self.source_lint),
            (Domain::ShellLint, &self.shell_lint),
            (Domain::ProseFormat, &self.prose_format),
            (Domain::ConfigFormat, &self.config_format),
        ]
        .into_iter()
        .filter(|(_, patterns)| !patterns.is_empty())
        .map(|(domain, patterns)| (domain, patterns.clone()))
        .collect()
    }

    pub fn selection_request(&self) -> SelectionRequest {
        SelectionRequest {
            domains: self.domains.clone(),
            skip_domains: self.skip_domains.clone(),
            targeted_domains: self.targets().into_keys().collect(),
        }
    }
}

/// Aggregate outcome of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Passed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::from(1),
        }
    }
}

/// `RUST_LOG` when set, else `warn` for dependencies and info/debug/trace for polylint crates.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!(
            "warn,polylint={level},polylint_cli={level},polylint_domain={level},polylint_scope={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load config, build the registry, then list, explain or run.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<RunStatus> {
    let repo_root = canonical_root(&cli.root)?;
    let file_config = config::load_or_default(&repo_root)?;
    let resolved = ConfigMerger::new(file_config)
        .merge_cli_args(
            &cli.project_configs,
            &cli.force_include,
            cli.prettier_config.as_deref(),
        )
        .resolve(&repo_root)?;
    debug!(?resolved, "resolved config");

    let registry = builtin_registry(&builtin_settings(&resolved))?;

    if cli.list_domains {
        let domains = registry.list();
        let rendered = match cli.format {
            OutputFormat::Text => explain::render_domains_text(&domains),
            OutputFormat::Json => explain::render_domains_json(&domains)? + "\n",
        };
        out.write_all(rendered.as_bytes())?;
        return Ok(RunStatus::Passed);
    }

    let cwd = current_dir()?;
    let lint_config = choose_source_lint_config(
        &repo_root,
        &cwd,
        cli.source_lint_config.as_deref(),
        cli.user_config,
    );

    let logger = TracingLogSink;
    let commands = SystemCommandPort;
    let mut ctx = ExecutionContext::new(repo_root.clone(), &logger, &commands);
    ctx.fix = cli.fix;
    ctx.verbosity = cli.verbose;
    ctx.chosen_config = lint_config.chosen;
    ctx.is_config_valid = lint_config.is_valid;
    ctx.targets = cli.targets();

    let selection = resolve_domain_selection(&cli.selection_request());
    let decisions = evaluate_domains(&registry, &selection, &ctx);

    if cli.explain {
        let rendered = match cli.format {
            OutputFormat::Text => explain::render_decisions_text(&decisions),
            OutputFormat::Json => explain::render_decisions_json(&decisions)? + "\n",
        };
        out.write_all(rendered.as_bytes())?;
        return Ok(RunStatus::Passed);
    }

    let had_failure = run_decisions(&registry, &decisions, &ctx);
    if had_failure {
        info!("one or more domains failed");
        Ok(RunStatus::Failed)
    } else {
        info!("all selected domains passed");
        Ok(RunStatus::Passed)
    }
}

fn builtin_settings(resolved: &ResolvedConfig) -> BuiltinSettings {
    BuiltinSettings {
        project_configs: resolved.project_configs.clone(),
        force_include: resolved.force_include.clone(),
        scope_root: Some(resolved.root.clone()),
        prettier_config: resolved.prettier_config.clone(),
    }
}

fn canonical_root(root: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    let canonical =
        fs::canonicalize(root).with_context(|| format!("resolve project root {root}"))?;
    Utf8PathBuf::from_path_buf(canonical)
        .map_err(|p| anyhow::anyhow!("project root is not valid UTF-8: {}", p.display()))
}

fn current_dir() -> anyhow::Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("read current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("current directory is not valid UTF-8: {}", p.display()))
}
