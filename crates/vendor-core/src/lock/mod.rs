//! Lock file model
//!
//! `.git-vendor/vendor.lock` records, per vendor and ref, the fingerprints
//! observed at the last successful sync or propagation. Hash maps are keyed
//! by the mapping's address string exactly as written in `vendor.yml`,
//! position suffix included.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{INTERNAL_SOURCE, LOCAL_REF};

/// Current lock file schema.
pub const LOCK_SCHEMA_VERSION: &str = "1.1";

fn default_schema_version() -> String {
    LOCK_SCHEMA_VERSION.to_string()
}

/// Parsed lock file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLock {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub vendors: Vec<LockEntry>,
}

impl Default for VendorLock {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            vendors: Vec::new(),
        }
    }
}

impl VendorLock {
    pub fn entry(&self, name: &str, reference: &str) -> Option<&LockEntry> {
        self.vendors
            .iter()
            .find(|e| e.name == name && e.reference == reference)
    }

    pub fn entry_mut(&mut self, name: &str, reference: &str) -> Option<&mut LockEntry> {
        self.vendors
            .iter_mut()
            .find(|e| e.name == name && e.reference == reference)
    }

    /// Insert or replace the entry with the same vendor and ref.
    pub fn upsert(&mut self, entry: LockEntry) {
        match self.entry_mut(&entry.name, &entry.reference) {
            Some(existing) => *existing = entry,
            None => self.vendors.push(entry),
        }
    }

    /// Remove every entry for `name`, returning what was removed.
    pub fn remove(&mut self, name: &str) -> Vec<LockEntry> {
        let (removed, kept) = std::mem::take(&mut self.vendors)
            .into_iter()
            .partition(|e| e.name == name);
        self.vendors = kept;
        removed
    }
}

/// Lock state of one vendor at one ref.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockEntry {
    pub name: String,

    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Upstream commit; `local` for internal vendors
    #[serde(default)]
    pub commit_hash: String,

    /// Source-side fingerprints, keyed by the mapping's `from` string
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source_file_hashes: BTreeMap<String, String>,

    /// Destination-side fingerprints, keyed by the mapping's `to` string
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_hashes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_spdx: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version_tag: Option<String>,

    pub updated: DateTime<Utc>,
}

impl LockEntry {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            source: None,
            commit_hash: String::new(),
            source_file_hashes: BTreeMap::new(),
            file_hashes: BTreeMap::new(),
            license_path: None,
            license_spdx: None,
            source_version_tag: None,
            updated: Utc::now(),
        }
    }

    /// Empty entry for an internal vendor.
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            source: Some(INTERNAL_SOURCE.to_string()),
            commit_hash: LOCAL_REF.to_string(),
            ..Self::new(name, LOCAL_REF)
        }
    }

    /// Record both fingerprints of a mapping.
    pub fn record(&mut self, from: &str, source_hash: &str, to: &str, dest_hash: &str) {
        self.source_file_hashes
            .insert(from.to_string(), source_hash.to_string());
        self.file_hashes.insert(to.to_string(), dest_hash.to_string());
    }

    /// Move a hash to a new key after an address was rewritten.
    pub fn rename_key(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        for hashes in [&mut self.source_file_hashes, &mut self.file_hashes] {
            if let Some(hash) = hashes.remove(old) {
                hashes.insert(new.to_string(), hash);
            }
        }
    }

    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}
