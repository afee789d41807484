use serde::{Deserialize, Serialize};

/// Resolved "files to check" / "files to ignore" glob pair.
///
/// Both lists are sorted, deduplicated, disjoint, and relative to one common root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePatterns {
    pub files: Vec<String>,
    pub ignore: Vec<String>,
}

impl ScopePatterns {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
