//! Filesystem capability used by the sync engine.
//!
//! Abstracting the filesystem lets the engine run against real disk in
//! production and against an in-memory map in tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use crate::NormalizedPath;
use crate::io::{RobustnessConfig, write_atomic};

/// Narrow filesystem interface.
///
/// Missing files surface as [`io::ErrorKind::NotFound`] so callers can tell
/// "absent" apart from other I/O failures.
pub trait FileSystem: Send + Sync {
    /// Read the entire file as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to a file, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all of its parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Filesystem backed by real disk I/O.
///
/// Writes go through [`write_atomic`], so an interrupted write never leaves
/// a truncated destination behind.
#[derive(Debug, Default)]
pub struct LocalFs {
    robustness: RobustnessConfig,
}

impl LocalFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: RobustnessConfig) -> Self {
        Self { robustness }
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        write_atomic(&NormalizedPath::new(path), contents, self.robustness).map_err(|e| match e {
            crate::Error::Io { source, .. } => source,
            other => io::Error::other(other.to_string()),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// In-memory filesystem keyed by normalized path.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<NormalizedPath, Vec<u8>>,
    dirs: BTreeSet<NormalizedPath>,
}

impl MemoryState {
    fn add_parents(&mut self, path: &NormalizedPath) {
        let mut current = path.parent();
        while let Some(dir) = current {
            current = dir.parent();
            self.dirs.insert(dir);
        }
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, returning `self` for chaining in test setup.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        let _ = self.write(path.as_ref(), contents.as_ref());
        self
    }

    /// Read a file back as a lossy UTF-8 string.
    pub fn read_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read(path.as_ref())
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Remove a file, returning whether it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let key = NormalizedPath::new(path);
        self.lock().files.remove(&key).is_some()
    }

    /// All file paths currently stored, in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.lock()
            .files
            .keys()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let key = NormalizedPath::new(path);
        self.lock().files.get(&key).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", key))
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let key = NormalizedPath::new(path);
        let mut state = self.lock();
        if state.dirs.contains(&key) {
            return Err(io::Error::other(format!("{} is a directory", key)));
        }
        state.add_parents(&key);
        state.files.insert(key, contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let key = NormalizedPath::new(path);
        let state = self.lock();
        state.files.contains_key(&key) || state.dirs.contains(&key)
    }

    fn is_file(&self, path: &Path) -> bool {
        let key = NormalizedPath::new(path);
        self.lock().files.contains_key(&key)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let key = NormalizedPath::new(path);
        let mut state = self.lock();
        if state.files.contains_key(&key) {
            return Err(io::Error::other(format!("{} is a file", key)));
        }
        state.add_parents(&key);
        state.dirs.insert(key);
        Ok(())
    }
}
