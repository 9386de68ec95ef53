//! Compliance action selection

use super::drift::DriftState;
use super::report::ComplianceAction;
use crate::config::ComplianceMode;

/// Options for compliance checks and propagation
#[derive(Debug, Clone, Default)]
pub struct ComplianceOptions {
    /// Restrict the run to one vendor
    pub vendor: Option<String>,
    /// If true, report intended actions without writing.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
    /// Under source-canonical, copy destination edits back to the source
    /// instead of only warning
    pub reverse: bool,
}

/// Pick the action for a mapping from its mode, drift state and the
/// reverse flag.
pub fn select_action(mode: ComplianceMode, state: DriftState, reverse: bool) -> ComplianceAction {
    match (mode, state) {
        (_, DriftState::Synced) => ComplianceAction::None,
        (_, DriftState::BothDrift) => ComplianceAction::Conflict,
        (_, DriftState::SourceDrift) => ComplianceAction::CopyToDest,
        (ComplianceMode::SourceCanonical, DriftState::DestDrift) if !reverse => {
            ComplianceAction::Warn
        }
        (_, DriftState::DestDrift) => ComplianceAction::CopyToSource,
    }
}
