//! [`TestProject`]: a throwaway project directory with a `.git-vendor/` area.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const CONFIG: &str = ".git-vendor/vendor.yml";
const LOCK: &str = ".git-vendor/vendor.lock";

/// A project root in a temp directory. Paths given to the helpers are
/// relative to that root; every helper panics with the full path on failure.
///
/// ```rust,no_run
/// use vendor_test_utils::{TestProject, VendorYaml};
///
/// let project = TestProject::new();
/// project.write_file("lib/a.txt", "hello\n");
/// project.write_config(&VendorYaml::new().internal("v", None, &[("lib/a.txt", "b.txt")]).build());
/// project.assert_file_exists(".git-vendor/vendor.yml");
/// ```
pub struct TestProject {
    dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("cannot create temp project: {e}"));
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating its directories.
    pub fn write_file(&self, relative: &str, content: impl AsRef<[u8]>) {
        let path = self.path(relative);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap_or_else(|e| panic!("mkdir {}: {e}", dir.display()));
        }
        fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    }

    pub fn read_file(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    pub fn write_config(&self, yaml: &str) {
        self.write_file(CONFIG, yaml);
    }

    pub fn read_config(&self) -> String {
        self.read_file(CONFIG)
    }

    pub fn read_lock(&self) -> String {
        self.read_file(LOCK)
    }

    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "missing: {}", path.display());
    }

    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(!path.exists(), "unexpectedly present: {}", path.display());
    }

    /// Compare full contents; the message shows both sides escaped so
    /// trailing newlines are visible.
    pub fn assert_file_eq(&self, relative: &str, expected: &str) {
        let actual = self.read_file(relative);
        assert!(
            actual == expected,
            "{relative}:\n  expected {expected:?}\n  actual   {actual:?}"
        );
    }

    pub fn assert_file_contains(&self, relative: &str, needle: &str) {
        let actual = self.read_file(relative);
        assert!(
            actual.contains(needle),
            "{relative} does not contain {needle:?}:\n{actual}"
        );
    }
}
