//! Drift classification

use serde::{Deserialize, Serialize};

/// How a mapping's two sides compare with their locked fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftState {
    /// Both sides match the lock
    Synced,
    /// Only the source changed
    SourceDrift,
    /// Only the destination changed
    DestDrift,
    /// Both sides changed
    BothDrift,
}

impl DriftState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::SourceDrift => "source_drift",
            Self::DestDrift => "dest_drift",
            Self::BothDrift => "both_drift",
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

impl std::fmt::Display for DriftState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare current fingerprints against locked ones.
///
/// Empty strings stand for "no fingerprint" (never locked, or the file is
/// missing) and never equal a real fingerprint. Pure function: callers pass
/// what they observed and what the lock recorded.
pub fn classify(
    locked_source: &str,
    current_source: &str,
    locked_dest: &str,
    current_dest: &str,
) -> DriftState {
    let source_changed = locked_source.is_empty() || locked_source != current_source;
    let dest_changed = locked_dest.is_empty() || locked_dest != current_dest;

    match (source_changed, dest_changed) {
        (false, false) => DriftState::Synced,
        (true, false) => DriftState::SourceDrift,
        (false, true) => DriftState::DestDrift,
        (true, true) => DriftState::BothDrift,
    }
}
