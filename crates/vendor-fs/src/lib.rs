//! Filesystem abstraction for git-vendor
//!
//! Provides normalized path handling, canonical `sha256:` checksums,
//! atomic locked writes, format-agnostic config persistence and a
//! narrow filesystem capability trait with local and in-memory backends.

pub mod checksum;
pub mod config;
pub mod error;
pub mod fs;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use fs::{FileSystem, LocalFs, MemoryFs};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
