//! File-backed stores under `.git-vendor/`

use std::path::{Path, PathBuf};

use tracing::debug;
use vendor_fs::{ConfigStore, Format, NormalizedPath};

use super::{CacheEntry, ChecksumCache, ConfigSource, LockSource, ProjectLayout};
use crate::config::VendorConfig;
use crate::lock::VendorLock;
use crate::{Error, Result};

/// `vendor.yml` on disk.
#[derive(Debug)]
pub struct FileConfigStore {
    path: NormalizedPath,
    store: ConfigStore,
}

impl FileConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: NormalizedPath::new(path),
            store: ConfigStore::new(),
        }
    }

    pub fn for_project(layout: &ProjectLayout) -> Self {
        Self::new(layout.config_path())
    }
}

impl ConfigSource for FileConfigStore {
    fn load(&self) -> Result<VendorConfig> {
        if !self.path.is_file() {
            return Err(Error::ConfigNotFound {
                path: self.path.to_native(),
            });
        }
        Ok(self.store.load_as(&self.path, Format::Yaml)?)
    }

    fn save(&self, config: &VendorConfig) -> Result<()> {
        debug!(path = %self.path, "Saving vendor configuration");
        Ok(self.store.save_as(&self.path, config, Format::Yaml)?)
    }
}

/// `vendor.lock` on disk, stored as YAML.
#[derive(Debug)]
pub struct FileLockStore {
    path: NormalizedPath,
    store: ConfigStore,
}

impl FileLockStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: NormalizedPath::new(path),
            store: ConfigStore::new(),
        }
    }

    pub fn for_project(layout: &ProjectLayout) -> Self {
        Self::new(layout.lock_path())
    }
}

impl LockSource for FileLockStore {
    fn load(&self) -> Result<VendorLock> {
        if !self.path.is_file() {
            debug!(path = %self.path, "No lock file, starting empty");
            return Ok(VendorLock::default());
        }
        Ok(self.store.load_as(&self.path, Format::Yaml)?)
    }

    fn save(&self, lock: &VendorLock) -> Result<()> {
        debug!(path = %self.path, vendors = lock.vendors.len(), "Saving lock file");
        Ok(self.store.save_as(&self.path, lock, Format::Yaml)?)
    }
}

/// One JSON file per vendor and ref under `.git-vendor/.cache/`.
#[derive(Debug)]
pub struct JsonChecksumCache {
    dir: PathBuf,
    store: ConfigStore,
}

impl JsonChecksumCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn for_project(layout: &ProjectLayout) -> Self {
        Self::new(layout.cache_dir())
    }

    fn entry_path(&self, vendor: &str, reference: &str) -> NormalizedPath {
        let sanitize = |s: &str| s.replace(['/', '\\', ':'], "_");
        NormalizedPath::new(
            self.dir
                .join(format!("{}@{}.json", sanitize(vendor), sanitize(reference))),
        )
    }
}

impl ChecksumCache for JsonChecksumCache {
    fn load(&self, vendor: &str, reference: &str) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(vendor, reference);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(self.store.load_as(&path, Format::Json)?))
    }

    fn save(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.vendor, &entry.reference);
        Ok(self.store.save_as(&path, entry, Format::Json)?)
    }

    fn delete(&self, vendor: &str, reference: &str) -> Result<()> {
        let path = self.entry_path(vendor, reference).to_native();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(vendor_fs::Error::io(path, e).into()),
        }
    }
}
