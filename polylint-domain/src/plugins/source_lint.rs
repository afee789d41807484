use super::{BuiltinSettings, run_tool};
use crate::context::ExecutionContext;
use crate::plugin::{DomainPlugin, DomainRunResult};
use anyhow::Context;
use camino::Utf8PathBuf;
use polylint_scope::{
    SOURCE_EXTENSIONS, ScopePatterns, ScopeResolver, load_project_descriptors,
    resolve_files_from_patterns, resolve_search_roots,
};
use polylint_types::{AvailabilityKind, Detection, Domain};
use tracing::debug;

const DEFAULT_SEARCH_ROOTS: &[&str] = &["src", "scripts", "tests"];
const CACHE_LOCATION: &str = ".cache/polylint/eslint/.eslintcache";
const NOT_RELEVANT: &str = "No ESLint-supported files matched in effective scope.";

pub struct SourceLintPlugin {
    project_configs: Vec<Utf8PathBuf>,
    force_include: Vec<String>,
    scope_root: Option<Utf8PathBuf>,
}

impl SourceLintPlugin {
    pub fn new(settings: &BuiltinSettings) -> Self {
        Self {
            project_configs: settings.project_configs.clone(),
            force_include: settings.force_include.clone(),
            scope_root: settings.scope_root.clone(),
        }
    }

    /// `None` when no project descriptor could be loaded.
    fn resolve_scope(&self, ctx: &ExecutionContext<'_>) -> Option<ScopePatterns> {
        let descriptors = load_project_descriptors(&self.project_configs);
        if descriptors.is_empty() {
            return None;
        }
        let force_base = self.scope_root.as_deref().unwrap_or(ctx.root());
        let scope = ScopeResolver::new(ctx.root().to_path_buf()).resolve(
            &descriptors,
            &self.force_include,
            force_base,
        );
        debug!(
            descriptors = descriptors.len(),
            files = scope.files.len(),
            ignore = scope.ignore.len(),
            "resolved source-lint scope"
        );
        Some(scope)
    }

    fn base_args(ctx: &ExecutionContext<'_>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(config) = &ctx.chosen_config {
            args.push("--config".to_string());
            args.push(config.to_string());
        }
        if ctx.fix {
            args.push("--fix".to_string());
        }
        args.extend(
            [
                "--cache",
                "--cache-location",
                CACHE_LOCATION,
                "--cache-strategy",
                "content",
                "--no-error-on-unmatched-pattern",
            ]
            .map(String::from),
        );
        args
    }
}

impl DomainPlugin for SourceLintPlugin {
    fn domain(&self) -> Domain {
        Domain::SourceLint
    }

    fn description(&self) -> &str {
        "Lint JavaScript/TypeScript/JSON sources with ESLint."
    }

    fn detect(&self, ctx: &ExecutionContext<'_>) -> anyhow::Result<Detection> {
        let available = ctx.commands.exists("eslint", ctx.root()).is_some();
        let unavailable = "eslint not found in node_modules/.bin or PATH.";

        if ctx.has_targets(Domain::SourceLint) {
            let targets = ctx.targets_for(Domain::SourceLint);
            let roots = resolve_search_roots(ctx.root(), targets);
            let matched = if roots.is_empty() {
                Vec::new()
            } else {
                resolve_files_from_patterns(ctx.root(), targets, SOURCE_EXTENSIONS)
                    .context("resolve source-lint targets")?
            };
            let relevant = !roots.is_empty();
            return Ok(Detection {
                relevant,
                relevance_reason: (!relevant).then(|| NOT_RELEVANT.to_string()),
                available: true,
                availability_kind: AvailabilityKind::Required,
                unavailable_reason: None,
                matched_files: matched,
            }
            .with_availability(available, unavailable));
        }

        let patterns = match self.resolve_scope(ctx) {
            Some(scope) if !scope.files.is_empty() => scope.files,
            _ => DEFAULT_SEARCH_ROOTS.iter().map(|p| p.to_string()).collect(),
        };
        let matched = resolve_files_from_patterns(ctx.root(), &patterns, SOURCE_EXTENSIONS)
            .context("resolve source-lint scope")?;

        Ok(
            Detection::from_matches(matched, AvailabilityKind::Required, NOT_RELEVANT)
                .with_availability(available, unavailable),
        )
    }

    fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        detection: &Detection,
    ) -> anyhow::Result<DomainRunResult> {
        let log = ctx.logger;
        let domain = Some(Domain::SourceLint);

        if !ctx.is_config_valid {
            log.error(
                domain,
                "Skipping ESLint: the --source-lint-config path does not exist.",
            );
            return Ok(DomainRunResult::failed());
        }

        let mut args = Self::base_args(ctx);

        if ctx.has_targets(Domain::SourceLint) {
            if detection.matched_files.is_empty() {
                return Ok(DomainRunResult::passed());
            }
            args.extend(detection.matched_files.iter().cloned());
        } else {
            let Some(scope) = self.resolve_scope(ctx) else {
                log.error(
                    domain,
                    "No project descriptor found. Set domains.source-lint.project-configs in polylint.toml or add a tsconfig.json.",
                );
                return Ok(DomainRunResult::failed());
            };
            if scope.files.is_empty() {
                log.warn(domain, "Project descriptors resolved to no file patterns; nothing to lint.");
                return Ok(DomainRunResult::passed());
            }
            for ignore in scope.ignore {
                args.push("--ignore-pattern".to_string());
                args.push(ignore);
            }
            args.extend(scope.files);
        }

        Ok(run_tool(ctx, Domain::SourceLint, "eslint", args, "ESLint"))
    }
}
