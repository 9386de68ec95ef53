//! Core engine for git-vendor
//!
//! Vendors copy files, or regions of files, from one place to another and
//! keep them in step. A mapping endpoint is a path with an optional
//! position suffix (`src/lib.go:L5-L20`); fingerprints of each side are
//! recorded in a lock file so that later runs can tell which side changed.
//!
//! # Modules
//!
//! - [`position`]: parse addresses, extract and place regions
//! - [`config`]: `vendor.yml` model, compliance modes and policy
//! - [`lock`]: `vendor.lock` model
//! - [`store`]: storage traits with file and in-memory backends
//! - [`graph`]: cycle detection over internal mappings
//! - [`validation`]: configuration validation
//! - [`sync`]: drift classification, compliance and the [`SyncEngine`]

pub mod config;
pub mod error;
pub mod graph;
pub mod lock;
pub mod ordered;
pub mod position;
pub mod store;
pub mod sync;
pub mod validation;

use std::path::{Path, PathBuf};

use vendor_fs::NormalizedPath;

pub use config::{ComplianceMode, Policy, VendorConfig};
pub use error::{Error, MappingFailure, Result};
pub use lock::{LockEntry, VendorLock};
pub use ordered::OrderedSet;
pub use position::{Extracted, PathSpec, Position, parse_path_position};
pub use sync::{ComplianceOptions, ComplianceReport, SyncEngine, SyncOptions, SyncReport};

/// Resolve a mapping path against the project root.
pub fn resolve_project_path(root: &Path, path: &str) -> PathBuf {
    NormalizedPath::new(root).join(path).to_native()
}
