//! Built-in domain plugins, one per `Domain`.

use crate::context::ExecutionContext;
use crate::plugin::{DomainPlugin, DomainRunResult};
use crate::ports::flatten_detail;
use crate::registry::{DomainRegistry, RegistryError};
use camino::Utf8PathBuf;
use polylint_types::Domain;

mod config_format;
mod prose_format;
mod shell_lint;
mod source_lint;

pub use config_format::ConfigFormatPlugin;
pub use prose_format::ProseFormatPlugin;
pub use shell_lint::ShellLintPlugin;
pub use source_lint::SourceLintPlugin;

/// Settings the built-in plugins take from `polylint.toml` and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinSettings {
    /// Existing project descriptor files (tsconfig-style) for source-lint.
    pub project_configs: Vec<Utf8PathBuf>,
    /// Patterns that override any descriptor exclude.
    pub force_include: Vec<String>,
    /// Directory `force_include` is relative to; the context root when unset.
    pub scope_root: Option<Utf8PathBuf>,
    /// Prettier config passed with `--config-precedence cli-override`.
    pub prettier_config: Option<Utf8PathBuf>,
}

pub fn builtin_plugins(settings: &BuiltinSettings) -> Vec<Box<dyn DomainPlugin>> {
    vec![
        Box::new(SourceLintPlugin::new(settings)),
        Box::new(ShellLintPlugin),
        Box::new(ProseFormatPlugin::new(settings.prettier_config.clone())),
        Box::new(ConfigFormatPlugin),
    ]
}

pub fn builtin_registry(settings: &BuiltinSettings) -> Result<DomainRegistry, RegistryError> {
    DomainRegistry::new(builtin_plugins(settings))
}

/// Explicit targets when given, else the domain's default scope.
fn effective_patterns(ctx: &ExecutionContext<'_>, domain: Domain, defaults: &[&str]) -> Vec<String> {
    if ctx.has_targets(domain) {
        ctx.targets_for(domain).to_vec()
    } else {
        defaults.iter().map(|p| p.to_string()).collect()
    }
}

/// Spawn `tool` in the context root and translate the outcome.
fn run_tool(
    ctx: &ExecutionContext<'_>,
    domain: Domain,
    tool: &str,
    args: Vec<String>,
    failure_label: &str,
) -> DomainRunResult {
    let log = ctx.logger;
    let Some(program) = ctx.commands.exists(tool, ctx.root()) else {
        log.error(Some(domain), &format!("{failure_label} failed. {tool} not found."));
        return DomainRunResult::failed();
    };

    log.info(Some(domain), &format!("Running {tool}: {program} {}", args.join(" ")));

    match ctx.commands.run(program.as_str(), &args, ctx.root()) {
        Ok(outcome) if outcome.success => DomainRunResult::passed(),
        Ok(outcome) => {
            let message = match outcome.code {
                Some(code) => format!("{failure_label} failed (exit code {code})."),
                None => format!("{failure_label} failed (terminated by signal)."),
            };
            log.error(Some(domain), &message);
            DomainRunResult::failed()
        }
        Err(e) => {
            let detail = flatten_detail(&format!("{e:#}"));
            let message = if detail.is_empty() {
                format!("{failure_label} failed.")
            } else {
                format!("{failure_label} failed. {detail}")
            };
            log.error(Some(domain), &message);
            DomainRunResult::failed()
        }
    }
}
