//! Validate command implementation

use std::path::Path;

use colored::Colorize;
use vendor_core::SyncEngine;

use crate::error::{CliError, Result};

/// Run the validate command
///
/// Lists every problem rather than stopping at the first.
pub fn run_validate(path: &Path) -> Result<()> {
    println!("{} Validating vendor configuration...", "=>".blue().bold());

    let engine = SyncEngine::open(path);
    let problems = engine.validation_problems()?;

    if problems.is_empty() {
        println!("{} Configuration is valid", "OK".green().bold());
        return Ok(());
    }

    println!("{} Configuration has problems:", "INVALID".red().bold());
    for problem in &problems {
        println!("   {} {}", "x".red(), problem);
    }
    Err(CliError::user(format!(
        "{} configuration problem(s) found",
        problems.len()
    )))
}
