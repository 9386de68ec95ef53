//! Sync command implementation

use std::path::Path;

use colored::Colorize;
use vendor_core::{SyncEngine, SyncOptions};

use crate::error::{CliError, Result};

/// Run the sync command
pub fn run_sync(path: &Path, vendor: Option<String>, dry_run: bool, force: bool) -> Result<()> {
    if dry_run {
        println!(
            "{} Syncing internal vendors {}...",
            "=>".blue().bold(),
            "(dry run)".dimmed()
        );
    } else {
        println!("{} Syncing internal vendors...", "=>".blue().bold());
    }

    let engine = SyncEngine::open(path);
    let options = SyncOptions {
        vendor,
        dry_run,
        force,
    };
    let report = engine.sync(&options)?;

    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }

    if !report.success {
        println!("{} Sync finished with errors:", "ERROR".red().bold());
        for error in &report.errors {
            println!("   {} {}", "x".red(), error);
        }
        return Err(CliError::user(format!(
            "{} mapping(s) failed to sync",
            report.errors.len()
        )));
    }

    println!("{} Sync complete", "OK".green().bold());
    Ok(())
}
