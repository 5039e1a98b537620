//! # plerion-report
//!
//! Pulls security findings from the Plerion API and builds a report of
//! publicly exposed assets that carry exploitable vulnerabilities.
//!
//! ## Features
//!
//! - **Paginated Fetch**: walks `page` / `perPage` collections until `meta.hasNextPage` is false
//! - **Retries**: transient failures retried per page with linear backoff
//! - **Partial Results**: a page that exhausts its retries stops the walk but keeps earlier pages
//! - **JSON Output**: each collection persisted as a pretty-printed array
//! - **Report**: DuckDB joins the two collections and exports xlsx, csv or parquet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plerion_report::{Config, FetchOrchestrator, HttpClient, HttpClientConfig, JsonWriter};
//!
//! #[tokio::main]
//! async fn main() -> plerion_report::Result<()> {
//!     let config = Config::from_file("config.json")?;
//!     let client = HttpClient::with_config(HttpClientConfig::from_config(&config))?;
//!
//!     let outcome = FetchOrchestrator::new(&client, config.base_url.clone(), JsonWriter::new("."))
//!         .run()
//!         .await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     FetchOrchestrator                     │
//! │   vulnerabilities ──(non-empty)──▶ assets ──▶ RunOutcome  │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬───────────────────┐
//! │  Paginator   │      HttpClient        │      Output       │
//! ├──────────────┼────────────────────────┼───────────────────┤
//! │ page/perPage │ GET + bearer token     │ JSON arrays       │
//! │ hasNextPage  │ Retry, linear backoff  │ DuckDB report     │
//! │ Done/Aborted │ Decode classification  │ xlsx/csv/parquet  │
//! └──────────────┴────────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and the fetch policy
pub mod types;

/// JSON configuration file
pub mod config;

/// HTTP client with retry
pub mod http;

/// Page-number pagination
pub mod pagination;

/// Collection fetch orchestration
pub mod fetch;

/// JSON persistence
pub mod output;

/// DuckDB report
pub mod report;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{FetchOrchestrator, FetchedCollection, RunOutcome};
pub use http::{HttpClient, HttpClientConfig};
pub use output::JsonWriter;
pub use pagination::{Paginator, PaginatedResult};
pub use report::{ReportEngine, ReportFormat};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
