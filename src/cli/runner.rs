//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{FetchOrchestrator, RunOutcome};
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::JsonWriter;
use crate::report::{ReportEngine, ReportFormat};
use crate::types::Collection;
use std::time::Instant;
use tracing::info;

/// What a CLI invocation ended with
#[derive(Debug, Clone, PartialEq)]
pub enum RunSummary {
    /// Collections fetched; no report requested
    Fetched(RunOutcome),
    /// A collection was empty so the report was not built
    Halted(Collection),
    /// Report written with this many rows
    Reported {
        /// Rows in the report
        rows: usize,
    },
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<RunSummary> {
        match self.cli.command() {
            Commands::Run => match self.fetch().await? {
                RunOutcome::HaltedEmpty(collection) => Ok(RunSummary::Halted(collection)),
                RunOutcome::Completed { .. } => {
                    let rows = self.report()?;
                    Ok(RunSummary::Reported { rows })
                }
            },
            Commands::Fetch => Ok(RunSummary::Fetched(self.fetch().await?)),
            Commands::Report => {
                let rows = self.report()?;
                Ok(RunSummary::Reported { rows })
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<Config> {
        let config = Config::from_file(&self.cli.config)?;
        info!("Loaded config from {}", self.cli.config.display());
        Ok(config)
    }

    fn writer(&self) -> JsonWriter {
        JsonWriter::new(&self.cli.output_dir)
    }

    /// Fetch and persist both collections
    async fn fetch(&self) -> Result<RunOutcome> {
        let config = self.load_config()?;
        let client = HttpClient::with_config(HttpClientConfig::from_config(&config))?;

        let start = Instant::now();
        let outcome = FetchOrchestrator::new(&client, config.base_url.clone(), self.writer())
            .run()
            .await?;
        info!("Fetch finished in {:.1}s", start.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// Build the report from the persisted collections
    fn report(&self) -> Result<usize> {
        let writer = self.writer();
        let vulnerabilities = writer.path_for(Collection::Vulnerabilities);
        let assets = writer.path_for(Collection::Assets);

        for path in [&vulnerabilities, &assets] {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        let output = self.cli.report_path();
        let format = match self.cli.format {
            Some(format) => format,
            None => ReportFormat::from_path(&output)?,
        };

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let engine = ReportEngine::new()?;
        engine.load(&vulnerabilities, &assets)?;
        engine.export(&output, format)
    }
}
