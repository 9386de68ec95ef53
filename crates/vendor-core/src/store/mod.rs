//! Persistence seams for configuration, lock and checksum cache
//!
//! The engine talks to storage only through the traits defined here so
//! that tests can substitute in-memory implementations.

mod file;
mod memory;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vendor_fs::FileSystem;
use vendor_fs::checksum::compute_bytes_checksum;

use crate::config::VendorConfig;
use crate::lock::VendorLock;
use crate::{Error, Result};

pub use file::{FileConfigStore, FileLockStore, JsonChecksumCache};
pub use memory::{MemoryChecksumCache, MemoryConfigStore, MemoryLockStore};

/// Directory holding git-vendor state, relative to the project root.
pub const VENDOR_DIR: &str = ".git-vendor";
pub const CONFIG_FILE: &str = "vendor.yml";
pub const LOCK_FILE: &str = "vendor.lock";
pub const CACHE_DIR: &str = ".cache";

/// Standard locations of git-vendor files under a project root.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(VENDOR_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.vendor_dir().join(CONFIG_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.vendor_dir().join(LOCK_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.vendor_dir().join(CACHE_DIR)
    }
}

/// Loads and saves `vendor.yml`.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<VendorConfig>;
    fn save(&self, config: &VendorConfig) -> Result<()>;
}

/// Loads and saves `vendor.lock`. A missing lock loads as empty.
pub trait LockSource: Send + Sync {
    fn load(&self) -> Result<VendorLock>;
    fn save(&self, lock: &VendorLock) -> Result<()>;
}

/// Whole-file checksums of a vendor's source files at its last sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub vendor: String,
    #[serde(rename = "ref")]
    pub reference: String,
    /// Source file path to `sha256:` checksum
    pub files: BTreeMap<String, String>,
    pub updated: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        vendor: impl Into<String>,
        reference: impl Into<String>,
        files: BTreeMap<String, String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            reference: reference.into(),
            files,
            updated: Utc::now(),
        }
    }
}

/// Incremental-sync cache keyed by vendor and ref.
pub trait ChecksumCache: Send + Sync {
    /// Checksum of a whole file as stored on disk.
    fn compute_file_checksum(&self, fs: &dyn FileSystem, path: &Path) -> Result<String> {
        let content = fs.read(path).map_err(|source| Error::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(compute_bytes_checksum(&content))
    }

    fn load(&self, vendor: &str, reference: &str) -> Result<Option<CacheEntry>>;
    fn save(&self, entry: &CacheEntry) -> Result<()>;
    fn delete(&self, vendor: &str, reference: &str) -> Result<()>;
}
