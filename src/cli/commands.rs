//! CLI commands and argument parsing

use crate::config::DEFAULT_CONFIG_FILE;
use crate::report::{ReportFormat, DEFAULT_REPORT_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fetch exploitable vulnerabilities and exposed assets, then build a report
#[derive(Parser, Debug)]
#[command(name = "plerion-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON with PlerionURL and PlerionAPIKey)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory for vulnerabilities.json, assets.json and relative report paths
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Report file
    #[arg(short, long, global = true, default_value = DEFAULT_REPORT_FILE)]
    pub report: PathBuf,

    /// Report format (inferred from the report extension when omitted)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<ReportFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Fetch both collections and build the report (default)
    Run,

    /// Fetch both collections without building the report
    Fetch,

    /// Build the report from previously fetched files
    Report,
}

impl Cli {
    /// Subcommand to execute
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    /// Report path, resolved against the output directory when relative
    pub fn report_path(&self) -> PathBuf {
        if self.report.is_absolute() {
            self.report.clone()
        } else {
            self.output_dir.join(&self.report)
        }
    }

    /// Log filter from `RUST_LOG` directives, INFO when unset.
    ///
    /// `--verbose` adds a DEBUG directive on top of whatever was given.
    pub fn log_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        let filter = match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
            Some(directives) => EnvFilter::new(directives),
            None => EnvFilter::new("info"),
        };
        if self.verbose {
            filter.add_directive(tracing::Level::DEBUG.into())
        } else {
            filter
        }
    }
}
