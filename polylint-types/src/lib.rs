//! Shared DTOs for the polylint workspace.
//!
//! # Design constraints
//! - Decisions and domain listings are serialized for `--explain` / `--list-domains` JSON output.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod decision;
pub mod detection;
pub mod domain;
pub mod scope;

pub use decision::{DomainDecision, DomainInfo, PlannedAction, SelectionSource};
pub use detection::{AvailabilityKind, Detection};
pub use domain::{Domain, UnknownDomain};
pub use scope::ScopePatterns;

/// Schema identifiers.
pub mod schema {
    pub const POLYLINT_EXPLAIN_V1: &str = "polylint.explain.v1";
    pub const POLYLINT_DOMAINS_V1: &str = "polylint.domains.v1";
}
