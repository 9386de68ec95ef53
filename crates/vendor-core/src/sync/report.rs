//! Report types for check, propagate and sync
//!
//! All reports serialize to JSON for `--json` output.

use serde::{Deserialize, Serialize};

use super::drift::DriftState;
use crate::error::MappingFailure;
use crate::{Error, Result};

/// What compliance does (or would do) for one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceAction {
    /// Nothing to do
    None,
    /// Copy the source region into the destination region
    CopyToDest,
    /// Copy the destination region back into the source region
    CopyToSource,
    /// Destination drifted under source-canonical; only warn
    Warn,
    /// Both sides drifted; manual resolution needed
    Conflict,
}

impl ComplianceAction {
    pub fn writes(&self) -> bool {
        matches!(self, Self::CopyToDest | Self::CopyToSource)
    }
}

/// Outcome of one mapping in a compliance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceEntry {
    pub vendor: String,
    /// `from` address as configured (after any rewrite)
    pub from: String,
    /// `to` address as configured (after any rewrite)
    pub to: String,
    pub state: DriftState,
    pub action: ComplianceAction,
    /// Human-readable description of what happened
    pub message: String,
}

/// Overall status of a compliance run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceResult {
    /// Every mapping is synced
    Synced,
    /// Some mappings drifted on one side
    Drifted,
    /// At least one mapping drifted on both sides
    Conflict,
}

impl std::fmt::Display for ComplianceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Synced => "SYNCED",
            Self::Drifted => "DRIFTED",
            Self::Conflict => "CONFLICT",
        })
    }
}

/// Counts of drift states across a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub synced: usize,
    pub source_drift: usize,
    pub dest_drift: usize,
    pub conflicts: usize,
    pub result: ComplianceResult,
}

impl Summary {
    pub fn from_entries(entries: &[ComplianceEntry]) -> Self {
        let count = |state: DriftState| entries.iter().filter(|e| e.state == state).count();
        let synced = count(DriftState::Synced);
        let source_drift = count(DriftState::SourceDrift);
        let dest_drift = count(DriftState::DestDrift);
        let conflicts = count(DriftState::BothDrift);

        let result = if conflicts > 0 {
            ComplianceResult::Conflict
        } else if source_drift + dest_drift > 0 {
            ComplianceResult::Drifted
        } else {
            ComplianceResult::Synced
        };

        Self {
            total: entries.len(),
            synced,
            source_drift,
            dest_drift,
            conflicts,
            result,
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::from_entries(&[])
    }
}

/// Report from a compliance check or propagation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub entries: Vec<ComplianceEntry>,
    /// Non-fatal messages, such as destination edits under source-canonical
    pub warnings: Vec<String>,
    /// Mappings that failed; empty for a clean run
    pub failures: Vec<MappingFailure>,
    /// Files written, in the order they were first written
    pub files_written: Vec<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
    pub summary: Summary,
}

impl ComplianceReport {
    /// Recompute the summary from the entries.
    pub fn finish(mut self) -> Self {
        self.summary = Summary::from_entries(&self.entries);
        self
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Turn recorded failures into a single aggregated error.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::PropagationFailed {
                failures: self.failures,
            })
        }
    }
}

/// Report from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the operation completed without errors
    pub success: bool,
    /// Actions taken (or, for dry runs, that would be taken)
    pub actions: Vec<String>,
    /// Local-modification and skip notices
    pub warnings: Vec<String>,
    /// Errors encountered during the operation
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful, empty sync report
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    /// Record an error and mark the report failed
    pub fn push_error(&mut self, error: String) {
        self.success = false;
        self.errors.push(error);
    }
}
