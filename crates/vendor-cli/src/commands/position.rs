//! Extract and place command implementations

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use vendor_core::{PathSpec, SyncEngine};

use crate::error::{CliError, Result};

/// Run the extract command
///
/// Prints the fingerprint on the first line, then the region text.
pub fn run_extract(path: &Path, spec: &str) -> Result<()> {
    let spec = PathSpec::parse(spec)?;
    let engine = SyncEngine::open(path);
    let extracted = engine.extract_position(&spec.path, spec.position.as_ref())?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", extracted.fingerprint)?;
    stdout.write_all(&extracted.text)?;
    if !extracted.text.is_empty() && !extracted.text.ends_with(b"\n") {
        writeln!(stdout)?;
    }
    Ok(())
}

/// Run the place command
pub fn run_place(path: &Path, target: &str, text: Option<&str>, from: Option<&str>) -> Result<()> {
    let target = PathSpec::parse(target)?;
    let engine = SyncEngine::open(path);

    let replacement = match (text, from) {
        (Some(text), _) => text.as_bytes().to_vec(),
        (None, Some(from)) => {
            let source = PathSpec::parse(from)?;
            engine
                .extract_position(&source.path, source.position.as_ref())?
                .text
        }
        (None, None) => return Err(CliError::user("either --text or --from is required")),
    };

    let placement = engine.place_content(&target.path, &replacement, target.position.as_ref())?;

    if !placement.written {
        println!("{} {} already holds this content", "OK".green().bold(), target);
        return Ok(());
    }

    println!("{} Placed content into {}", "OK".green().bold(), target);
    let delta = placement.line_delta();
    if delta != 0 {
        println!(
            "   {} line count changed by {:+} ({} -> {})",
            "!".yellow(),
            delta,
            placement.old_line_count,
            placement.new_line_count
        );
    }
    Ok(())
}
