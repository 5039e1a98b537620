//! plerion-report CLI
//!
//! Fetches exploitable vulnerabilities and publicly exposed assets, then
//! writes the joined report.

use clap::Parser;
use plerion_report::cli::{Cli, RunSummary, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter(rust_log.as_deref()))
        .init();

    let runner = Runner::new(cli);

    match runner.run().await {
        Ok(RunSummary::Halted(collection)) => {
            tracing::info!("Nothing to report: no {collection} matched");
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
