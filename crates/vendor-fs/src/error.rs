//! Error types for vendor-fs

use std::io;
use std::path::PathBuf;

use crate::config::Format;

/// Result type for vendor-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vendor-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing `path` failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A config file did not deserialize
    #[error("invalid {format} in {path}: {message}")]
    Parse {
        path: PathBuf,
        format: Format,
        message: String,
    },

    /// A value could not be encoded for saving
    #[error("cannot encode {path} as {format}: {message}")]
    Encode {
        path: PathBuf,
        format: Format,
        message: String,
    },

    /// No config format is known for this extension
    #[error("no config format for extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The advisory lock next to `path` stayed held past the timeout
    #[error("timed out waiting for the lock on {path}")]
    LockTimeout { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
