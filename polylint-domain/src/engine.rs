//! Decision Evaluator and Runner.
//!
//! Evaluation probes each selected domain once and records a decision for every domain in
//! canonical order. Running consumes those decisions without re-probing, so `--explain` and a
//! real run share the same logic.

use crate::context::ExecutionContext;
use crate::plugin::DomainRunResult;
use crate::ports::flatten_detail;
use crate::registry::DomainRegistry;
use crate::selection::DomainSelection;
use polylint_types::{AvailabilityKind, Detection, Domain, DomainDecision, PlannedAction};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::debug;

/// The planned action for one domain.
///
/// `detection` is `None` when the domain is selected but its probe failed.
pub fn plan_action(
    selected: bool,
    explicitly_requested: bool,
    detection: Option<&Detection>,
) -> PlannedAction {
    if !selected {
        return PlannedAction::SkipUnselected;
    }
    let Some(detection) = detection else {
        return PlannedAction::FailDetection;
    };
    if !detection.relevant {
        return PlannedAction::SkipNotRelevant;
    }
    if !detection.available {
        return if detection.availability_kind == AvailabilityKind::Required || explicitly_requested
        {
            PlannedAction::FailUnavailable
        } else {
            PlannedAction::SkipUnavailable
        };
    }
    PlannedAction::Run
}

/// One decision per domain, in canonical order. Unselected domains are never probed.
pub fn evaluate_domains(
    registry: &DomainRegistry,
    selection: &DomainSelection,
    ctx: &ExecutionContext<'_>,
) -> Vec<DomainDecision> {
    Domain::ALL
        .into_iter()
        .map(|domain| evaluate_domain(registry, selection, ctx, domain))
        .collect()
}

fn evaluate_domain(
    registry: &DomainRegistry,
    selection: &DomainSelection,
    ctx: &ExecutionContext<'_>,
    domain: Domain,
) -> DomainDecision {
    let selected = selection.is_selected(domain);
    let explicitly_requested = selection.is_explicit(domain);

    let (detection, detection_error) = if !selected {
        (None, None)
    } else {
        match registry.get(domain) {
            None => (
                None,
                Some(format!("No lint domain plugin registered for: `{domain}`")),
            ),
            Some(plugin) => match guarded(|| plugin.detect(ctx)) {
                Ok(detection) => (Some(detection), None),
                Err(message) => (None, Some(message)),
            },
        }
    };

    let planned_action = plan_action(selected, explicitly_requested, detection.as_ref());
    debug!(
        domain = domain.as_str(),
        action = planned_action.as_str(),
        "domain evaluated"
    );

    DomainDecision {
        domain,
        description: registry.description(domain),
        selected,
        explicitly_requested,
        selection_source: selection.source(domain),
        detection,
        planned_action,
        detection_error,
    }
}

/// Execute decisions in order. Returns `true` when any domain failed.
///
/// A failing or panicking domain never stops later domains.
pub fn run_decisions(
    registry: &DomainRegistry,
    decisions: &[DomainDecision],
    ctx: &ExecutionContext<'_>,
) -> bool {
    let log = ctx.logger;
    let mut had_failure = false;

    for decision in decisions {
        let domain = decision.domain;
        let scope = Some(domain);

        match decision.planned_action {
            PlannedAction::SkipUnselected => {}
            PlannedAction::FailDetection => {
                let detail = decision
                    .detection_error
                    .as_deref()
                    .unwrap_or("unknown error");
                log.error(
                    scope,
                    &format!("Domain \"{domain}\" detection failed. {detail}"),
                );
                had_failure = true;
            }
            PlannedAction::SkipNotRelevant => {
                if decision.explicitly_requested {
                    let reason = decision
                        .detection
                        .as_ref()
                        .and_then(|d| d.relevance_reason.as_deref())
                        .unwrap_or("No files matched in effective scope.");
                    log.warn(
                        scope,
                        &format!(
                            "Domain \"{domain}\" was explicitly requested, but no files matched. {reason}"
                        ),
                    );
                }
            }
            PlannedAction::FailUnavailable => {
                log.error(
                    scope,
                    &format!("Domain \"{domain}\" cannot run. {}", unavailable_reason(decision)),
                );
                had_failure = true;
            }
            PlannedAction::SkipUnavailable => {
                log.warn(
                    scope,
                    &format!("Domain \"{domain}\" skipped. {}", unavailable_reason(decision)),
                );
            }
            PlannedAction::Run => {
                if !run_one(registry, decision, ctx) {
                    had_failure = true;
                }
            }
        }
    }

    had_failure
}

/// Evaluate then run. Returns `true` when any domain failed.
pub fn run_domains(
    registry: &DomainRegistry,
    selection: &DomainSelection,
    ctx: &ExecutionContext<'_>,
) -> bool {
    let decisions = evaluate_domains(registry, selection, ctx);
    run_decisions(registry, &decisions, ctx)
}

/// Returns `true` on success.
fn run_one(registry: &DomainRegistry, decision: &DomainDecision, ctx: &ExecutionContext<'_>) -> bool {
    let domain = decision.domain;
    let (Some(plugin), Some(detection)) = (registry.get(domain), decision.detection.as_ref()) else {
        ctx.logger.error(
            Some(domain),
            &format!("Domain \"{domain}\" failed unexpectedly. No plugin or detection to run."),
        );
        return false;
    };

    match guarded(|| plugin.run(ctx, detection)) {
        Ok(DomainRunResult { had_failure }) => {
            debug!(domain = domain.as_str(), had_failure, "domain finished");
            !had_failure
        }
        Err(message) => {
            ctx.logger.error(
                Some(domain),
                &format!("Domain \"{domain}\" failed unexpectedly. {message}"),
            );
            false
        }
    }
}

fn unavailable_reason(decision: &DomainDecision) -> String {
    decision
        .detection
        .as_ref()
        .and_then(|d| d.unavailable_reason.clone())
        .unwrap_or_else(|| format!("Tooling for domain \"{}\" is not available.", decision.domain))
}

/// Run `f`, turning both `Err` and panics into a message.
fn guarded<T>(f: impl FnOnce() -> anyhow::Result<T>) -> Result<T, String> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(flatten_detail(&format!("{e:#}"))),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polylint_types::AvailabilityKind::{Optional, Required};

    fn detection(relevant: bool, available: bool, kind: AvailabilityKind) -> Detection {
        Detection {
            relevant,
            relevance_reason: None,
            available,
            availability_kind: kind,
            unavailable_reason: None,
            matched_files: vec![],
        }
    }

    fn expected(
        selected: bool,
        relevant: bool,
        available: bool,
        kind: AvailabilityKind,
        explicit: bool,
    ) -> PlannedAction {
        match (selected, relevant, available) {
            (false, _, _) => PlannedAction::SkipUnselected,
            (true, false, _) => PlannedAction::SkipNotRelevant,
            (true, true, true) => PlannedAction::Run,
            (true, true, false) if kind == Required || explicit => PlannedAction::FailUnavailable,
            (true, true, false) => PlannedAction::SkipUnavailable,
        }
    }

    #[test]
    fn decision_matrix() {
        for selected in [true, false] {
            for relevant in [true, false] {
                for available in [true, false] {
                    for kind in [Required, Optional] {
                        for explicit in [true, false] {
                            let d = detection(relevant, available, kind);
                            let got = plan_action(selected, explicit, Some(&d));
                            assert_eq!(
                                got,
                                expected(selected, relevant, available, kind, explicit),
                                "selected={selected} relevant={relevant} available={available} \
                                 kind={kind:?} explicit={explicit}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn optional_missing_tool_fails_only_when_explicit() {
        let d = detection(true, false, Optional);
        assert_eq!(plan_action(true, false, Some(&d)), PlannedAction::SkipUnavailable);
        assert_eq!(plan_action(true, true, Some(&d)), PlannedAction::FailUnavailable);
    }

    #[test]
    fn failed_probe_is_fail_detection_only_when_selected() {
        assert_eq!(plan_action(true, false, None), PlannedAction::FailDetection);
        assert_eq!(plan_action(false, true, None), PlannedAction::SkipUnselected);
    }

    #[test]
    fn guarded_catches_errors_and_panics() {
        let err = guarded::<()>(|| Err(anyhow::anyhow!("inner").context("outer"))).unwrap_err();
        assert_eq!(err, "outer: inner");

        let panicked = guarded::<()>(|| panic!("boom")).unwrap_err();
        assert_eq!(panicked, "panicked: boom");
    }
}
