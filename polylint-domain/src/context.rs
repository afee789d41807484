use crate::ports::{CommandPort, LogSink};
use camino::{Utf8Path, Utf8PathBuf};
use polylint_types::Domain;
use std::collections::BTreeMap;

/// Per-invocation inputs shared by every domain. Built by the CLI; read-only here.
pub struct ExecutionContext<'a> {
    /// Directory tools run in and matched files are relative to.
    pub root: Utf8PathBuf,
    pub fix: bool,
    pub verbosity: u8,
    /// Source-lint config override.
    pub chosen_config: Option<Utf8PathBuf>,
    /// False when an explicitly supplied override path does not exist.
    pub is_config_valid: bool,
    /// Explicit target patterns per domain (empty means default scope).
    pub targets: BTreeMap<Domain, Vec<String>>,
    pub logger: &'a dyn LogSink,
    pub commands: &'a dyn CommandPort,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        root: impl Into<Utf8PathBuf>,
        logger: &'a dyn LogSink,
        commands: &'a dyn CommandPort,
    ) -> Self {
        Self {
            root: root.into(),
            fix: false,
            verbosity: 0,
            chosen_config: None,
            is_config_valid: true,
            targets: BTreeMap::new(),
            logger,
            commands,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn targets_for(&self, domain: Domain) -> &[String] {
        self.targets.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_targets(&self, domain: Domain) -> bool {
        !self.targets_for(domain).is_empty()
    }

    /// Domains with at least one explicit target pattern.
    pub fn targeted_domains(&self) -> Vec<Domain> {
        self.targets
            .iter()
            .filter(|(_, patterns)| !patterns.is_empty())
            .map(|(domain, _)| *domain)
            .collect()
    }
}
