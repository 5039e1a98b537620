//! CLI module
//!
//! Command-line interface for fetching and reporting.
//!
//! # Commands
//!
//! - `run` - Fetch both collections, then build the report (default)
//! - `fetch` - Fetch both collections only
//! - `report` - Build the report from files written by an earlier fetch

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{RunSummary, Runner};
