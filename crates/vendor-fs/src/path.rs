//! Slash-separated project paths
//!
//! Mapping addresses in `vendor.yml` are written with forward slashes on
//! every platform. [`NormalizedPath`] gives them one canonical spelling so
//! `pkg\util.go`, `./pkg/util.go` and `pkg//util.go` compare equal.

use std::fmt;
use std::path::{Path, PathBuf};

/// A lexically cleaned, forward-slash path.
///
/// `.` segments and repeated separators are dropped and `..` pops the
/// previous segment (never past the start). A leading `/` or `//` is kept.
/// The filesystem is never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self {
            inner: normalize(&raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Native path for I/O; the empty path becomes `.`.
    pub fn to_native(&self) -> PathBuf {
        match self.inner.as_str() {
            "" => PathBuf::from("."),
            inner => PathBuf::from(inner),
        }
    }

    /// Append a relative segment (which may itself contain separators).
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = segment.as_ref().to_string_lossy().replace('\\', "/");
        let joined = match self.inner.as_str() {
            "" => segment,
            root if root.ends_with('/') => format!("{root}{segment}"),
            base => format!("{base}/{segment}"),
        };
        Self {
            inner: normalize(&joined),
        }
    }

    /// The containing directory. `None` for a single segment or a root.
    pub fn parent(&self) -> Option<Self> {
        let (dir, name) = self.inner.rsplit_once('/')?;
        if name.is_empty() {
            return None;
        }
        let inner = if dir.is_empty() { "/" } else { dir };
        Some(Self {
            inner: inner.to_string(),
        })
    }

    /// Last segment, or `None` for the empty path and roots.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next() {
            Some("") | None => None,
            name => name,
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Extension of the last segment. Dotfiles such as `.gitignore` have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.inner.rsplit('/').next()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

fn normalize(path: &str) -> String {
    let (root, rest) = if let Some(rest) = path.strip_prefix("//")
        && !rest.starts_with('/')
    {
        ("//", rest)
    } else if path.starts_with('/') {
        ("/", path.trim_start_matches('/'))
    } else {
        ("", path)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    let mut out = String::with_capacity(path.len());
    out.push_str(root);
    out.push_str(&segments.join("/"));
    out
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl<T: AsRef<Path> + ?Sized> From<&T> for NormalizedPath {
    fn from(path: &T) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_chain_ends_at_root() {
        let path = NormalizedPath::new("/vendor.yml");
        let root = path.parent().unwrap();
        assert_eq!(root.as_str(), "/");
        assert!(root.parent().is_none());
        assert!(NormalizedPath::new("vendor.yml").parent().is_none());
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(NormalizedPath::new("./cache/a@b.json").file_name(), Some("a@b.json"));
        assert_eq!(NormalizedPath::new("vendor.yml").file_name(), Some("vendor.yml"));
        assert_eq!(NormalizedPath::new("/").file_name(), None);
        assert_eq!(NormalizedPath::new("").file_name(), None);
    }

    #[test]
    fn is_file_consults_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = NormalizedPath::new(dir.path()).join("a.txt");
        assert!(!file.exists());
        std::fs::write(file.to_native(), "x").unwrap();
        assert!(file.is_file());
        assert!(NormalizedPath::new(dir.path()).exists());
        assert!(!NormalizedPath::new(dir.path()).is_file());
    }

    #[test]
    fn join_onto_root_stays_rooted() {
        assert_eq!(NormalizedPath::new("/").join("tmp").as_str(), "/tmp");
    }

    #[test]
    fn join_accepts_native_segments() {
        let base = NormalizedPath::new("project");
        assert_eq!(base.join(Path::new("lib\\a.go")).as_str(), "project/lib/a.go");
    }
}
