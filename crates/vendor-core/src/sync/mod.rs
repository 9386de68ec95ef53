//! Compliance checking, propagation and sync for internal vendors
//!
//! This module provides:
//! - **drift**: classify a mapping against its locked fingerprints
//! - **compliance**: choose what to do about drift
//! - **adjust**: rewrite addresses after a placement changes line counts
//! - **report**: serializable results of each operation
//! - **engine**: the [`SyncEngine`] facade that runs them against storage

mod adjust;
mod compliance;
mod drift;
mod engine;
mod report;

pub use adjust::{AddressRewrite, adjust_sibling_positions, resize_for_replacement};
pub use compliance::{ComplianceOptions, select_action};
pub use drift::{DriftState, classify};
pub use engine::{SyncEngine, SyncOptions};
pub use report::{
    ComplianceAction, ComplianceEntry, ComplianceReport, ComplianceResult, Summary, SyncReport,
};
