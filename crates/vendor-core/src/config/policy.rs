//! Compliance modes and the policy that constrains them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of an internal mapping is authoritative when only one side
/// has drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceMode {
    /// The source wins; destination edits only warn unless reversed.
    #[default]
    SourceCanonical,
    /// Whichever side changed is copied to the other.
    Bidirectional,
}

impl ComplianceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceCanonical => "source-canonical",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl FromStr for ComplianceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source-canonical" => Ok(Self::SourceCanonical),
            "bidirectional" => Ok(Self::Bidirectional),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide immutable settings passed into validation and compliance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Compliance modes a vendor may declare
    pub allowed_compliance: Vec<ComplianceMode>,
}

impl Policy {
    pub fn allows(&self, mode: ComplianceMode) -> bool {
        self.allowed_compliance.contains(&mode)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_compliance: vec![ComplianceMode::SourceCanonical, ComplianceMode::Bidirectional],
        }
    }
}
