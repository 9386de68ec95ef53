//! Error types for vendor-core

use std::fmt;
use std::path::PathBuf;

/// Result type for vendor-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// One mapping that failed during a best-effort propagation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MappingFailure {
    /// Vendor the mapping belongs to
    pub vendor: String,
    /// Mapping identifier, `from -> to`
    pub mapping: String,
    /// Rendered error message
    pub message: String,
}

impl fmt::Display for MappingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.vendor, self.mapping, self.message)
    }
}

fn join_failures(failures: &[MappingFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur in vendor-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path suffix could not be parsed as a position address
    #[error("invalid position in '{input}': {reason}")]
    AddressParse { input: String, reason: String },

    /// Requested line is outside the file
    #[error("line {line} does not exist: file has {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },

    /// End line precedes start line
    #[error("invalid line range: end line {end} is before start line {start}")]
    InvalidLineRange { start: usize, end: usize },

    /// Requested column is outside its line
    #[error("column {column} exceeds line length {line_length} on line {line}")]
    ColumnOutOfRange {
        line: usize,
        column: usize,
        line_length: usize,
    },

    /// End column precedes start column on a single line
    #[error("invalid column range: end column {end} is before start column {start}")]
    InvalidColumnRange { start: usize, end: usize },

    /// Null byte found in the binary scan window
    #[error("binary file: null byte found in the first {window} bytes")]
    BinaryContent { window: usize },

    /// Placement target could not be read
    #[error("failed to read target file {path}: {source}")]
    ReadTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping source could not be read
    #[error("failed to read source file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Both sides drifted; needs manual resolution
    #[error("conflict in vendor '{vendor}': both {from} and {to} changed since last sync")]
    ComplianceConflict {
        vendor: String,
        from: String,
        to: String,
    },

    /// Position adjustment would invert a line range
    #[error(
        "cannot adjust position {mapping} in vendor '{vendor}': end line {end_line} would precede start line {start_line}"
    )]
    PositionDelta {
        vendor: String,
        mapping: String,
        start_line: usize,
        end_line: i64,
    },

    /// Internal mappings form a cycle
    #[error("circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// Compliance mode is unknown or not allowed by policy
    #[error("vendor '{vendor}': invalid compliance mode '{mode}'")]
    InvalidComplianceMode { vendor: String, mode: String },

    /// Internal vendor declares a remote URL
    #[error("internal vendor '{vendor}' must not have a URL (found '{url}')")]
    InternalVendorUrl { vendor: String, url: String },

    /// Internal vendor uses a ref other than `local`
    #[error("internal vendor '{vendor}' must use ref 'local' (found '{reference}')")]
    InternalVendorRef { vendor: String, reference: String },

    /// Internal mapping source does not exist
    #[error("vendor '{vendor}': source file {path} does not exist")]
    MissingSourceFile { vendor: String, path: String },

    /// Two vendors share a name
    #[error("duplicate vendor name '{name}'")]
    DuplicateVendor { name: String },

    /// External vendor has no URL
    #[error("external vendor '{vendor}' has no URL")]
    ExternalVendorUrl { vendor: String },

    /// No vendor.yml at the expected location
    #[error("vendor configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Vendor name not present in configuration
    #[error("vendor '{name}' not found")]
    VendorNotFound { name: String },

    /// Aggregate of per-mapping propagation failures
    #[error("{} mapping(s) failed to propagate: {}", .failures.len(), join_failures(.failures))]
    PropagationFailed { failures: Vec<MappingFailure> },

    /// Filesystem error from vendor-fs
    #[error(transparent)]
    Fs(#[from] vendor_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Line or column bounds errors, including inverted ranges.
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            Self::AddressParse { .. }
                | Self::LineOutOfRange { .. }
                | Self::InvalidLineRange { .. }
                | Self::ColumnOutOfRange { .. }
                | Self::InvalidColumnRange { .. }
        )
    }

    /// Configuration validation errors.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidComplianceMode { .. }
                | Self::InternalVendorUrl { .. }
                | Self::InternalVendorRef { .. }
                | Self::MissingSourceFile { .. }
                | Self::DuplicateVendor { .. }
                | Self::ExternalVendorUrl { .. }
                | Self::CircularDependency { .. }
        )
    }
}
