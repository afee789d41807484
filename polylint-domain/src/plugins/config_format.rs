use super::{effective_patterns, run_tool};
use crate::context::ExecutionContext;
use crate::plugin::{DomainPlugin, DomainRunResult};
use anyhow::Context;
use polylint_scope::resolve_files_from_patterns;
use polylint_types::{AvailabilityKind, Detection, Domain};

const NIX_EXTENSIONS: &[&str] = &["nix"];
const DEFAULT_PATTERNS: &[&str] = &["flake.nix", "shell.nix", "default.nix", "nix/**/*.nix"];

pub struct ConfigFormatPlugin;

impl DomainPlugin for ConfigFormatPlugin {
    fn domain(&self) -> Domain {
        Domain::ConfigFormat
    }

    fn description(&self) -> &str {
        "Format and check Nix files with nixfmt."
    }

    fn detect(&self, ctx: &ExecutionContext<'_>) -> anyhow::Result<Detection> {
        let patterns = effective_patterns(ctx, Domain::ConfigFormat, DEFAULT_PATTERNS);
        let matched = resolve_files_from_patterns(ctx.root(), &patterns, NIX_EXTENSIONS)
            .context("resolve config-format scope")?;
        let available = ctx.commands.exists("nixfmt", ctx.root()).is_some();

        Ok(Detection::from_matches(
            matched,
            AvailabilityKind::Optional,
            "No Nix files matched in effective scope.",
        )
        .with_availability(available, "nixfmt not found in environment."))
    }

    fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        detection: &Detection,
    ) -> anyhow::Result<DomainRunResult> {
        if detection.matched_files.is_empty() {
            return Ok(DomainRunResult::passed());
        }

        let mut args = Vec::with_capacity(detection.matched_files.len() + 1);
        if !ctx.fix {
            args.push("--check".to_string());
        }
        args.extend(detection.matched_files.iter().cloned());

        let label = if ctx.fix { "nixfmt write" } else { "nixfmt check" };
        Ok(run_tool(ctx, Domain::ConfigFormat, "nixfmt", args, label))
    }
}
