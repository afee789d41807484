use crate::detection::Detection;
use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// How a domain ended up selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionSource {
    /// No selector given; every domain runs.
    Default,
    /// Named via `--domain`.
    DomainFlag,
    /// Implied by domain-specific target patterns.
    TargetFlag,
    Unselected,
}

impl SelectionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionSource::Default => "default",
            SelectionSource::DomainFlag => "domain-flag",
            SelectionSource::TargetFlag => "target-flag",
            SelectionSource::Unselected => "unselected",
        }
    }
}

/// The next step for a domain, computed before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlannedAction {
    Run,
    SkipUnselected,
    SkipNotRelevant,
    SkipUnavailable,
    FailUnavailable,
    FailDetection,
}

impl PlannedAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PlannedAction::Run => "run",
            PlannedAction::SkipUnselected => "skip-unselected",
            PlannedAction::SkipNotRelevant => "skip-not-relevant",
            PlannedAction::SkipUnavailable => "skip-unavailable",
            PlannedAction::FailUnavailable => "fail-unavailable",
            PlannedAction::FailDetection => "fail-detection",
        }
    }

    /// True for actions that mark the aggregate result failed without running anything.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            PlannedAction::FailUnavailable | PlannedAction::FailDetection
        )
    }
}

/// Outcome of evaluating one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDecision {
    pub domain: Domain,
    pub description: String,
    pub selected: bool,
    pub explicitly_requested: bool,
    pub selection_source: SelectionSource,

    /// `None` when detection never ran (unselected) or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<Detection>,

    pub planned_action: PlannedAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_error: Option<String>,
}

/// Registry metadata for `--list-domains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub domain: Domain,
    pub description: String,
    pub target_flag: String,
}
