use crate::context::ExecutionContext;
use polylint_types::{Detection, Domain};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainRunResult {
    pub had_failure: bool,
}

impl DomainRunResult {
    pub fn passed() -> Self {
        Self { had_failure: false }
    }

    pub fn failed() -> Self {
        Self { had_failure: true }
    }
}

/// One checking domain.
pub trait DomainPlugin {
    fn domain(&self) -> Domain;

    fn description(&self) -> &str;

    /// Cheap relevance/availability probe. Reads the filesystem and may look a program up on
    /// `PATH`; never spawns the tool itself.
    fn detect(&self, ctx: &ExecutionContext<'_>) -> anyhow::Result<Detection>;

    /// Run the check (or fix) over `detection.matched_files`.
    fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        detection: &Detection,
    ) -> anyhow::Result<DomainRunResult>;
}
