use polylint_types::{Domain, SelectionSource};
use std::collections::{BTreeMap, BTreeSet};

/// Selector flags as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    /// `--domain`
    pub domains: Vec<Domain>,
    /// `--skip-domain`
    pub skip_domains: Vec<Domain>,
    /// Domains with at least one target pattern (`--shell-lint <PATTERN>` etc.).
    pub targeted_domains: Vec<Domain>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSelection {
    pub selected: BTreeSet<Domain>,
    /// Always a subset of `selected`.
    pub explicitly_requested: BTreeSet<Domain>,
    pub sources: BTreeMap<Domain, SelectionSource>,
}

impl DomainSelection {
    pub fn is_selected(&self, domain: Domain) -> bool {
        self.selected.contains(&domain)
    }

    pub fn is_explicit(&self, domain: Domain) -> bool {
        self.explicitly_requested.contains(&domain)
    }

    pub fn source(&self, domain: Domain) -> SelectionSource {
        self.sources
            .get(&domain)
            .copied()
            .unwrap_or(SelectionSource::Unselected)
    }
}

/// Precedence: `--domain` beats target-flag inference, which beats the all-domains default.
/// `--skip-domain` is applied last and always wins.
pub fn resolve_domain_selection(request: &SelectionRequest) -> DomainSelection {
    let skip: BTreeSet<Domain> = request.skip_domains.iter().copied().collect();
    let has_selectors = !request.domains.is_empty() || !skip.is_empty();

    let mut explicitly_requested: BTreeSet<Domain> = request
        .domains
        .iter()
        .chain(&request.targeted_domains)
        .copied()
        .collect();

    let (mut selected, source): (BTreeSet<Domain>, SelectionSource) = if !request.domains.is_empty()
    {
        (
            request.domains.iter().copied().collect(),
            SelectionSource::DomainFlag,
        )
    } else if !has_selectors && !request.targeted_domains.is_empty() {
        (
            request.targeted_domains.iter().copied().collect(),
            SelectionSource::TargetFlag,
        )
    } else {
        (Domain::ALL.into_iter().collect(), SelectionSource::Default)
    };

    selected.retain(|d| !skip.contains(d));
    explicitly_requested.retain(|d| selected.contains(d));
    let sources = selected.iter().map(|d| (*d, source)).collect();

    DomainSelection {
        selected,
        explicitly_requested,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(domains: &[Domain]) -> BTreeSet<Domain> {
        domains.iter().copied().collect()
    }

    #[test]
    fn no_flags_selects_everything_by_default() {
        let selection = resolve_domain_selection(&SelectionRequest::default());
        assert_eq!(selection.selected, set(&Domain::ALL));
        assert!(selection.explicitly_requested.is_empty());
        for domain in Domain::ALL {
            assert_eq!(selection.source(domain), SelectionSource::Default);
        }
    }

    #[test]
    fn domain_flag_beats_target_inference() {
        let selection = resolve_domain_selection(&SelectionRequest {
            domains: vec![Domain::ProseFormat],
            targeted_domains: vec![Domain::ShellLint],
            ..Default::default()
        });
        assert_eq!(selection.selected, set(&[Domain::ProseFormat]));
        assert_eq!(selection.explicitly_requested, set(&[Domain::ProseFormat]));
        assert_eq!(selection.source(Domain::ProseFormat), SelectionSource::DomainFlag);
        assert_eq!(selection.source(Domain::ShellLint), SelectionSource::Unselected);
    }

    #[test]
    fn targets_alone_select_their_domains() {
        let selection = resolve_domain_selection(&SelectionRequest {
            targeted_domains: vec![Domain::ShellLint, Domain::ConfigFormat],
            ..Default::default()
        });
        assert_eq!(selection.selected, set(&[Domain::ShellLint, Domain::ConfigFormat]));
        assert_eq!(selection.explicitly_requested, selection.selected);
        assert_eq!(selection.source(Domain::ShellLint), SelectionSource::TargetFlag);
    }

    #[test]
    fn skip_disables_target_inference_but_keeps_target_explicit() {
        let selection = resolve_domain_selection(&SelectionRequest {
            skip_domains: vec![Domain::SourceLint],
            targeted_domains: vec![Domain::ShellLint],
            ..Default::default()
        });
        assert_eq!(
            selection.selected,
            set(&[Domain::ShellLint, Domain::ProseFormat, Domain::ConfigFormat])
        );
        assert_eq!(selection.explicitly_requested, set(&[Domain::ShellLint]));
        assert_eq!(selection.source(Domain::ShellLint), SelectionSource::Default);
        assert_eq!(selection.source(Domain::SourceLint), SelectionSource::Unselected);
    }

    #[test]
    fn skip_always_wins() {
        let selection = resolve_domain_selection(&SelectionRequest {
            domains: vec![Domain::ShellLint, Domain::ProseFormat],
            skip_domains: vec![Domain::ShellLint],
            targeted_domains: vec![Domain::ShellLint],
        });
        assert_eq!(selection.selected, set(&[Domain::ProseFormat]));
        assert_eq!(selection.explicitly_requested, set(&[Domain::ProseFormat]));
        assert!(!selection.sources.contains_key(&Domain::ShellLint));
    }
}
