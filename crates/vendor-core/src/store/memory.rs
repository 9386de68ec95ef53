//! In-memory stores for tests and dry runs

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CacheEntry, ChecksumCache, ConfigSource, LockSource};
use crate::config::VendorConfig;
use crate::lock::VendorLock;
use crate::Result;

fn lock_poisoned<T>(e: std::sync::PoisonError<T>) -> crate::Error {
    crate::Error::Io(std::io::Error::other(format!("store lock poisoned: {e}")))
}

/// Configuration held in memory.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: Mutex<VendorConfig>,
    saves: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new(config: VendorConfig) -> Self {
        Self {
            config: Mutex::new(config),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times [`ConfigSource::save`] was called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> VendorConfig {
        self.config
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl ConfigSource for MemoryConfigStore {
    fn load(&self) -> Result<VendorConfig> {
        Ok(self.config.lock().map_err(lock_poisoned)?.clone())
    }

    fn save(&self, config: &VendorConfig) -> Result<()> {
        *self.config.lock().map_err(lock_poisoned)? = config.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Lock held in memory.
#[derive(Debug, Default)]
pub struct MemoryLockStore {
    lock: Mutex<VendorLock>,
    saves: AtomicUsize,
}

impl MemoryLockStore {
    pub fn new(lock: VendorLock) -> Self {
        Self {
            lock: Mutex::new(lock),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times [`LockSource::save`] was called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> VendorLock {
        self.lock.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LockSource for MemoryLockStore {
    fn load(&self) -> Result<VendorLock> {
        Ok(self.lock.lock().map_err(lock_poisoned)?.clone())
    }

    fn save(&self, lock: &VendorLock) -> Result<()> {
        *self.lock.lock().map_err(lock_poisoned)? = lock.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Checksum cache held in memory.
#[derive(Debug, Default)]
pub struct MemoryChecksumCache {
    entries: Mutex<BTreeMap<(String, String), CacheEntry>>,
}

impl MemoryChecksumCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChecksumCache for MemoryChecksumCache {
    fn load(&self, vendor: &str, reference: &str) -> Result<Option<CacheEntry>> {
        let entries = self.entries.lock().map_err(lock_poisoned)?;
        Ok(entries
            .get(&(vendor.to_string(), reference.to_string()))
            .cloned())
    }

    fn save(&self, entry: &CacheEntry) -> Result<()> {
        self.entries.lock().map_err(lock_poisoned)?.insert(
            (entry.vendor.clone(), entry.reference.clone()),
            entry.clone(),
        );
        Ok(())
    }

    fn delete(&self, vendor: &str, reference: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(lock_poisoned)?
            .remove(&(vendor.to_string(), reference.to_string()));
        Ok(())
    }
}
