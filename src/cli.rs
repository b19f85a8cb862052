//! Command-line interface module for renfiles.
//!
//! This module handles:
//! - Argument parsing
//! - Configuration loading and command line overrides
//! - Wiring scanner, classifier, executor and label assigner into a batch

use crate::batch::{BatchRunner, RunOptions, Summary};
use crate::classify::ClassificationEngine;
use crate::config::Config;
use crate::error::Result;
use crate::executor::{ExecutionMode, MoveExecutor};
use crate::output::OutputFormatter;
use crate::scan::scan_source;
use clap::Parser;
use std::path::PathBuf;

/// Renames PDF files by filename pattern and files them into a destination
/// tree, attaching labels with the `tag` tool.
#[derive(Debug, Clone, Parser)]
#[command(name = "renfiles", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./renfiles.toml, then ~/.config/renfiles/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source directory, overrides the configuration
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Destination root, overrides the configuration
    #[arg(short = 'd', long = "dest", value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Only print what would be done; nothing is changed
    #[arg(short = 't', long = "dry-run", visible_alias = "test")]
    pub dry_run: bool,

    /// Report intermediate decisions such as unrecognized names
    #[arg(short, long, visible_alias = "debug")]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            mode: if self.dry_run {
                ExecutionMode::DryRun
            } else {
                ExecutionMode::Live
            },
            verbose: self.verbose,
        }
    }
}

/// Loads the configuration named by `cli` and runs the batch.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use renfiles::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["renfiles", "--dry-run", "--source", "/inbox"]);
/// match run_cli(&cli) {
///     Ok(summary) => println!("{} files handled", summary.processed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<Summary> {
    let config = Config::load(cli.config.as_deref())?
        .with_overrides(cli.source.clone(), cli.dest.clone());
    run_with_config(&config, cli.options())
}

/// Scans the configured source directory and processes every candidate.
///
/// Only configuration and listing failures are returned as errors; per-file
/// failures are counted in the summary.
pub fn run_with_config(config: &Config, options: RunOptions) -> Result<Summary> {
    let dry_run = options.mode == ExecutionMode::DryRun;
    let source = &config.directories.source;
    let destination = &config.directories.destination;

    OutputFormatter::info(&format!("source: {}", source.display()));
    OutputFormatter::info(&format!("destination: {}", destination.display()));
    if dry_run {
        OutputFormatter::dry_run_notice("no files will be changed");
    }

    let filters = config.filters.compile()?;
    let candidates = scan_source(source, &filters)?;
    if candidates.is_empty() {
        OutputFormatter::plain("No files found to rename.");
    }

    let labeler = config.labels.assigner();
    let executor = MoveExecutor::new(destination.clone(), options.mode, labeler.as_ref());
    let runner = BatchRunner::new(ClassificationEngine::default(), executor, options.verbose);

    let summary = runner.run(&candidates);
    OutputFormatter::summary_table(&summary, dry_run);
    Ok(summary)
}
