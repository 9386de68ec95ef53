//! Check and propagate command implementations

use std::path::Path;

use colored::Colorize;
use vendor_core::sync::{ComplianceAction, ComplianceEntry, ComplianceResult};
use vendor_core::{ComplianceOptions, ComplianceReport, SyncEngine};

use crate::error::{CliError, Result};

/// Run the check command
///
/// Fails when any mapping is in conflict or could not be evaluated.
pub fn run_check(path: &Path, vendor: Option<String>, json: bool) -> Result<()> {
    if !json {
        println!("{} Checking vendor compliance...", "=>".blue().bold());
    }

    let engine = SyncEngine::open(path);
    let options = ComplianceOptions {
        vendor,
        ..Default::default()
    };
    let report = engine.check_compliance(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.summary.result == ComplianceResult::Conflict {
        return Err(CliError::user(format!(
            "{} mapping(s) changed on both sides; resolve them manually",
            report.summary.conflicts
        )));
    }
    report.into_result()?;
    Ok(())
}

/// Run the propagate command
pub fn run_propagate(
    path: &Path,
    vendor: Option<String>,
    dry_run: bool,
    reverse: bool,
    json: bool,
) -> Result<()> {
    if !json {
        if dry_run {
            println!(
                "{} Propagating vendor changes {}...",
                "=>".blue().bold(),
                "(dry run)".dimmed()
            );
        } else {
            println!("{} Propagating vendor changes...", "=>".blue().bold());
        }
    }

    let engine = SyncEngine::open(path);
    let options = ComplianceOptions {
        vendor,
        dry_run,
        reverse,
    };
    let report = engine.propagate_compliance(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        for file in &report.files_written {
            println!("   {} {}", "+".green(), file);
        }
    }

    report.into_result()?;
    Ok(())
}

fn print_report(report: &ComplianceReport) {
    let summary = &report.summary;
    match summary.result {
        ComplianceResult::Synced => {
            println!(
                "{} {} mapping(s) in sync",
                "OK".green().bold(),
                summary.total
            );
        }
        ComplianceResult::Drifted => {
            println!(
                "{} {} of {} mapping(s) drifted",
                "DRIFTED".yellow().bold(),
                summary.source_drift + summary.dest_drift,
                summary.total
            );
        }
        ComplianceResult::Conflict => {
            println!(
                "{} {} mapping(s) changed on both sides",
                "CONFLICT".red().bold(),
                summary.conflicts
            );
        }
    }

    for entry in report
        .entries
        .iter()
        .filter(|e| e.action != ComplianceAction::None)
    {
        print_entry(entry);
    }

    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
    for failure in &report.failures {
        println!("   {} {}", "x".red(), failure);
    }
}

fn print_entry(entry: &ComplianceEntry) {
    let marker = match entry.action {
        ComplianceAction::CopyToDest | ComplianceAction::CopyToSource => "~".cyan(),
        ComplianceAction::Warn => "!".yellow(),
        ComplianceAction::Conflict => "x".red(),
        ComplianceAction::None => " ".normal(),
    };
    println!(
        "   {} {} {} -> {} ({}): {}",
        marker,
        entry.vendor.bold(),
        entry.from,
        entry.to,
        entry.state.to_string().dimmed(),
        entry.message
    );
}
