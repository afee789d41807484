//! Rendering for `--list-domains` and `--explain`.
//!
//! Text output is a fixed-width table; JSON output wraps the same data in a schema envelope.

use polylint_types::schema::{POLYLINT_DOMAINS_V1, POLYLINT_EXPLAIN_V1};
use polylint_types::{DomainDecision, DomainInfo, PlannedAction};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DomainsReport<'a> {
    schema: &'static str,
    domains: &'a [DomainInfo],
}

#[derive(Debug, Serialize)]
struct ExplainReport<'a> {
    schema: &'static str,
    decisions: &'a [DomainDecision],
}

pub fn render_domains_json(domains: &[DomainInfo]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DomainsReport {
        schema: POLYLINT_DOMAINS_V1,
        domains,
    })
}

pub fn render_domains_text(domains: &[DomainInfo]) -> String {
    let mut out = String::from("Available domains:\n\n");
    out.push_str(&format!("  {:<16} {:<18} DESCRIPTION\n", "DOMAIN", "TARGET FLAG"));
    out.push_str(&format!("  {:<16} {:<18} -----------\n", "------", "-----------"));
    for info in domains {
        out.push_str(&format!(
            "  {:<16} {:<18} {}\n",
            info.domain.as_str(),
            info.target_flag,
            info.description
        ));
    }
    out.push_str("\nUse 'polylint --explain' to see what would run.\n");
    out
}

pub fn render_decisions_json(decisions: &[DomainDecision]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExplainReport {
        schema: POLYLINT_EXPLAIN_V1,
        decisions,
    })
}

pub fn render_decisions_text(decisions: &[DomainDecision]) -> String {
    let mut out = String::from("Domain decisions:\n\n");
    out.push_str(&format!(
        "  {:<16} {:<9} {:<9} {:<12} {:<18} DETAIL\n",
        "DOMAIN", "SELECTED", "EXPLICIT", "SOURCE", "ACTION"
    ));
    out.push_str(&format!(
        "  {:<16} {:<9} {:<9} {:<12} {:<18} ------\n",
        "------", "--------", "--------", "------", "------"
    ));
    for decision in decisions {
        out.push_str(&format!(
            "  {:<16} {:<9} {:<9} {:<12} {:<18} {}\n",
            decision.domain.as_str(),
            yes_no(decision.selected),
            yes_no(decision.explicitly_requested),
            decision.selection_source.as_str(),
            decision.planned_action.as_str(),
            decision_detail(decision),
        ));
    }
    out
}

/// One-line reason for a decision's planned action.
pub fn decision_detail(decision: &DomainDecision) -> String {
    let detection = decision.detection.as_ref();
    match decision.planned_action {
        PlannedAction::Run => {
            let count = detection.map_or(0, |d| d.matched_files.len());
            format!("{count} file(s) matched")
        }
        PlannedAction::SkipUnselected => "-".to_string(),
        PlannedAction::SkipNotRelevant => detection
            .and_then(|d| d.relevance_reason.clone())
            .unwrap_or_else(|| "No files matched in effective scope.".to_string()),
        PlannedAction::SkipUnavailable | PlannedAction::FailUnavailable => detection
            .and_then(|d| d.unavailable_reason.clone())
            .unwrap_or_else(|| "Tooling is not available.".to_string()),
        PlannedAction::FailDetection => decision
            .detection_error
            .clone()
            .unwrap_or_else(|| "Detection failed.".to_string()),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
