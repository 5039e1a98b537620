//! DuckDB-based report engine
//!
//! Reads the two persisted collections with `read_json`, joins assets to their
//! vulnerabilities and exports the distinct asset ids.

use super::ReportFormat;
use crate::error::{Error, Result};
use duckdb::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Projection of a vulnerability record used by the report
const VULNERABILITIES_VIEW: &str = "SELECT assetId,
        vulnerabilityId,
        severityLevel,
        severityLevelValue,
        severitySource,
        hasKev,
        hasExploit";

/// Projection of an asset record used by the report
const ASSETS_VIEW: &str = "SELECT id,
        name,
        type,
        fullResourceName,
        isPubliclyExposed";

/// Distinct vulnerable, publicly exposed assets
const REPORT_VIEW: &str = "CREATE OR REPLACE VIEW report AS
    SELECT DISTINCT a.id AS assetId
    FROM assets a
    INNER JOIN vulnerabilities v ON a.id = v.assetId";

/// Report rows in export order
const REPORT_ROWS: &str = "SELECT * FROM report ORDER BY assetId";

/// Report engine over an in-memory DuckDB connection
pub struct ReportEngine {
    conn: Connection,
}

impl ReportEngine {
    /// Create a new engine
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::report(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self { conn })
    }

    /// Register the persisted collections and the report view
    pub fn load(&self, vulnerabilities: &Path, assets: &Path) -> Result<()> {
        let sql = format!(
            "CREATE OR REPLACE VIEW vulnerabilities AS {VULNERABILITIES_VIEW} FROM read_json('{}');
             CREATE OR REPLACE VIEW assets AS {ASSETS_VIEW} FROM read_json('{}');
             {REPORT_VIEW};",
            sql_path(vulnerabilities)?,
            sql_path(assets)?,
        );

        debug!("Loading collections: {}", sql);
        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::report(format!("Failed to load collections: {e}")))?;
        Ok(())
    }

    /// Number of rows in a registered view
    pub fn count(&self, view: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {view}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::report(format!("Failed to count {view}: {e}")))?;
        Ok(count.max(0) as usize)
    }

    /// Write the report to a file, returning the number of rows written
    pub fn export(&self, output: &Path, format: ReportFormat) -> Result<usize> {
        let target = sql_path(output)?;
        let sql = match format {
            ReportFormat::Xlsx => format!(
                "INSTALL spatial; LOAD spatial;
                 COPY ({REPORT_ROWS}) TO '{target}' WITH (FORMAT GDAL, DRIVER 'xlsx');"
            ),
            ReportFormat::Csv => {
                format!("COPY ({REPORT_ROWS}) TO '{target}' (HEADER, DELIMITER ',');")
            }
            ReportFormat::Parquet => format!(
                "COPY ({REPORT_ROWS}) TO '{target}' (FORMAT PARQUET, COMPRESSION 'SNAPPY');"
            ),
        };

        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::report(format!("Failed to write {format} report: {e}")))?;

        let rows = self.count("report")?;
        info!("Report saved to {} ({} assets)", output.display(), rows);
        Ok(rows)
    }
}

impl std::fmt::Debug for ReportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEngine").finish_non_exhaustive()
    }
}

/// Path as a single-quoted SQL string body
fn sql_path(path: &Path) -> Result<String> {
    let path = path
        .to_str()
        .ok_or_else(|| Error::report(format!("Path is not valid UTF-8: {}", path.display())))?;
    Ok(path.replace('\'', "''"))
}
