use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One independently toggleable category of checking.
///
/// Declaration order is the canonical execution order; `Ord` follows it, so a
/// `BTreeSet<Domain>` iterates in the order domains are evaluated and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    SourceLint,
    ShellLint,
    ProseFormat,
    ConfigFormat,
}

impl Domain {
    /// All domains in canonical execution order.
    pub const ALL: [Domain; 4] = [
        Domain::SourceLint,
        Domain::ShellLint,
        Domain::ProseFormat,
        Domain::ConfigFormat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::SourceLint => "source-lint",
            Domain::ShellLint => "shell-lint",
            Domain::ProseFormat => "prose-format",
            Domain::ConfigFormat => "config-format",
        }
    }

    /// CLI flag that supplies explicit target patterns for this domain.
    pub fn target_flag(self) -> &'static str {
        match self {
            Domain::SourceLint => "--source-lint",
            Domain::ShellLint => "--shell-lint",
            Domain::ProseFormat => "--prose-format",
            Domain::ConfigFormat => "--config-format",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lint domain `{name}` (expected one of: source-lint, shell-lint, prose-format, config-format)")]
pub struct UnknownDomain {
    pub name: String,
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| UnknownDomain {
                name: s.to_string(),
            })
    }
}
