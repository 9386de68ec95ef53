//! git-vendor CLI
//!
//! The command-line interface for position-addressed vendoring.

mod cli;
mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_tracing();
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => {
            let root = resolve_root(cli.root.as_deref())?;
            execute_command(&root, cmd)
        }
        None => {
            println!("{} position-addressed vendoring", "git-vendor".green().bold());
            println!();
            println!("Run {} for available commands.", "git-vendor --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `debug`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };
    dunce::canonicalize(&root).map_err(|e| {
        CliError::user(format!("Invalid project root {}: {}", root.display(), e))
    })
}

fn execute_command(root: &Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check { vendor, json } => commands::run_check(root, vendor, json),
        Commands::Propagate {
            vendor,
            dry_run,
            reverse,
            json,
        } => commands::run_propagate(root, vendor, dry_run, reverse, json),
        Commands::Sync {
            vendor,
            dry_run,
            force,
        } => commands::run_sync(root, vendor, dry_run, force),
        Commands::Validate => commands::run_validate(root),
        Commands::Extract { spec } => commands::run_extract(root, &spec),
        Commands::Place { target, text, from } => {
            commands::run_place(root, &target, text.as_deref(), from.as_deref())
        }
    }
}
