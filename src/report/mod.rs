//! Report module
//!
//! Joins the persisted collections with DuckDB and exports the list of
//! publicly exposed assets that carry an exploitable vulnerability.

mod engine;

pub use engine::ReportEngine;

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Default report file name
pub const DEFAULT_REPORT_FILE: &str = "result.xlsx";

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Excel workbook via the DuckDB spatial extension
    #[default]
    Xlsx,
    /// Comma-separated values with a header row
    Csv,
    /// Parquet
    Parquet,
}

impl ReportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            _ => Err(Error::config(format!(
                "Cannot infer report format from '{}'; use --format",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Csv => write!(f, "csv"),
            Self::Parquet => write!(f, "parquet"),
        }
    }
}
