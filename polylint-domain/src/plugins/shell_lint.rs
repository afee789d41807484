use super::{effective_patterns, run_tool};
use crate::context::ExecutionContext;
use crate::plugin::{DomainPlugin, DomainRunResult};
use anyhow::Context;
use polylint_scope::resolve_files_from_patterns;
use polylint_types::{AvailabilityKind, Detection, Domain};

const SHELL_EXTENSIONS: &[&str] = &["sh"];
const DEFAULT_SEARCH_ROOTS: &[&str] = &["src", "scripts", "tests"];

pub struct ShellLintPlugin;

impl DomainPlugin for ShellLintPlugin {
    fn domain(&self) -> Domain {
        Domain::ShellLint
    }

    fn description(&self) -> &str {
        "Lint shell scripts with ShellCheck."
    }

    fn detect(&self, ctx: &ExecutionContext<'_>) -> anyhow::Result<Detection> {
        let patterns = effective_patterns(ctx, Domain::ShellLint, DEFAULT_SEARCH_ROOTS);
        let matched = resolve_files_from_patterns(ctx.root(), &patterns, SHELL_EXTENSIONS)
            .context("resolve shell-lint scope")?;
        let available = ctx.commands.exists("shellcheck", ctx.root()).is_some();

        Ok(Detection::from_matches(
            matched,
            AvailabilityKind::Optional,
            "No shell script files matched in effective scope.",
        )
        .with_availability(available, "shellcheck not found in environment."))
    }

    fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        detection: &Detection,
    ) -> anyhow::Result<DomainRunResult> {
        if detection.matched_files.is_empty() {
            return Ok(DomainRunResult::passed());
        }
        if ctx.fix {
            ctx.logger.info(
                Some(Domain::ShellLint),
                "ShellCheck has no fix mode; checking only.",
            );
        }

        Ok(run_tool(
            ctx,
            Domain::ShellLint,
            "shellcheck",
            detection.matched_files.clone(),
            "ShellCheck",
        ))
    }
}
