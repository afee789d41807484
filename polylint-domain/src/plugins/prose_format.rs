use super::{effective_patterns, run_tool};
use crate::context::ExecutionContext;
use crate::plugin::{DomainPlugin, DomainRunResult};
use anyhow::Context;
use camino::Utf8PathBuf;
use polylint_scope::resolve_files_from_patterns;
use polylint_types::{AvailabilityKind, Detection, Domain};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];
const ROOT_FILES: &[&str] = &["README.md", "AGENTS.md"];
const DEFAULT_PATTERNS: &[&str] = &["README.md", "AGENTS.md", "pages", "blog", "docs"];

pub struct ProseFormatPlugin {
    prettier_config: Option<Utf8PathBuf>,
}

impl ProseFormatPlugin {
    pub fn new(prettier_config: Option<Utf8PathBuf>) -> Self {
        Self { prettier_config }
    }

    fn prettier_args(&self, fix: bool, files: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(files.len() + 6);
        if let Some(config) = &self.prettier_config {
            args.extend([
                "--config".to_string(),
                config.to_string(),
                "--config-precedence".to_string(),
                "cli-override".to_string(),
            ]);
        }
        args.push("--no-editorconfig".to_string());
        args.push(if fix { "--write" } else { "--check" }.to_string());
        args.extend(files.iter().cloned());
        args
    }
}

impl DomainPlugin for ProseFormatPlugin {
    fn domain(&self) -> Domain {
        Domain::ProseFormat
    }

    fn description(&self) -> &str {
        "Format and check Markdown/MDX files with Prettier."
    }

    fn detect(&self, ctx: &ExecutionContext<'_>) -> anyhow::Result<Detection> {
        let patterns = effective_patterns(ctx, Domain::ProseFormat, DEFAULT_PATTERNS);
        let mut matched = resolve_files_from_patterns(ctx.root(), &patterns, MARKDOWN_EXTENSIONS)
            .context("resolve prose-format scope")?;

        if !ctx.has_targets(Domain::ProseFormat) {
            for name in ROOT_FILES.iter().rev() {
                if !matched.iter().any(|m| m.as_str() == *name) && ctx.root().join(name).is_file() {
                    matched.insert(0, name.to_string());
                }
            }
        }

        let available = ctx.commands.exists("prettier", ctx.root()).is_some();
        Ok(Detection::from_matches(
            matched,
            AvailabilityKind::Required,
            "No Markdown/MDX files matched in effective scope.",
        )
        .with_availability(available, "prettier not found in node_modules/.bin or PATH."))
    }

    fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        detection: &Detection,
    ) -> anyhow::Result<DomainRunResult> {
        if detection.matched_files.is_empty() {
            return Ok(DomainRunResult::passed());
        }

        let args = self.prettier_args(ctx.fix, &detection.matched_files);
        let label = if ctx.fix { "Prettier write" } else { "Prettier check" };
        Ok(run_tool(ctx, Domain::ProseFormat, "prettier", args, label))
    }
}
