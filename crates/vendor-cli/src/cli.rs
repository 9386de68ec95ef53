//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// git-vendor - Vendor files and file regions, and keep them in sync
#[derive(Parser, Debug)]
#[command(name = "git-vendor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root containing .git-vendor/
    #[arg(long, global = true, env = "GIT_VENDOR_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Report drift of internal vendor mappings
    ///
    /// Exits non-zero when any mapping changed on both sides.
    Check {
        /// Only check this vendor
        #[arg(long)]
        vendor: Option<String>,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Copy drifted regions according to each vendor's compliance mode
    ///
    /// Examples:
    ///   git-vendor propagate              # Source changes flow to destinations
    ///   git-vendor propagate --reverse    # Also copy destination edits back
    ///   git-vendor propagate --dry-run    # Preview without writing
    Propagate {
        /// Only propagate this vendor
        #[arg(long)]
        vendor: Option<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Copy destination edits back to the source for source-canonical vendors
        #[arg(long)]
        reverse: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Copy every internal mapping from source to destination
    Sync {
        /// Only sync this vendor
        #[arg(long)]
        vendor: Option<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Ignore the checksum cache
        #[arg(long)]
        force: bool,
    },

    /// Validate vendor.yml, including cycle detection
    Validate,

    /// Print the fingerprint and content of a file region
    ///
    /// Examples:
    ///   git-vendor extract src/lib.go:L5-L20
    ///   git-vendor extract README.md:L1C1:L1C12
    Extract {
        /// Path with optional position, e.g. `file.txt:L5-L20`
        spec: String,
    },

    /// Replace a file region with new content
    ///
    /// Examples:
    ///   git-vendor place out.txt:L2 --text "replacement"
    ///   git-vendor place out.txt:L2-L4 --from lib.txt:L10-L12
    Place {
        /// Target path with optional position
        target: String,

        /// Literal replacement text
        #[arg(long, conflicts_with = "from", required_unless_present = "from")]
        text: Option<String>,

        /// Take the replacement from another file region
        #[arg(long)]
        from: Option<String>,
    },
}
