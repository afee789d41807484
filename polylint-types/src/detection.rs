use serde::{Deserialize, Serialize};

/// Whether missing tooling is always fatal (`required`) or only when the
/// domain was explicitly requested (`optional`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityKind {
    Required,
    Optional,
}

impl AvailabilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityKind::Required => "required",
            AvailabilityKind::Optional => "optional",
        }
    }
}

/// Result of probing one domain: relevance, tool availability and the files in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub relevant: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_reason: Option<String>,

    pub available: bool,

    pub availability_kind: AvailabilityKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,

    /// Root-relative, forward-slash paths. Reused by `run` so it never rescans.
    #[serde(default)]
    pub matched_files: Vec<String>,
}

impl Detection {
    /// Relevant iff `matched_files` is non-empty; tooling assumed available.
    pub fn from_matches(
        matched_files: Vec<String>,
        availability_kind: AvailabilityKind,
        not_relevant_reason: &str,
    ) -> Self {
        let relevant = !matched_files.is_empty();
        Self {
            relevant,
            relevance_reason: (!relevant).then(|| not_relevant_reason.to_string()),
            available: true,
            availability_kind,
            unavailable_reason: None,
            matched_files,
        }
    }

    pub fn with_availability(mut self, available: bool, unavailable_reason: &str) -> Self {
        self.available = available;
        self.unavailable_reason = (!available).then(|| unavailable_reason.to_string());
        self
    }
}
