//! Sequential collection fetcher

use crate::error::Result;
use crate::output::JsonWriter;
use crate::pagination::{PageSource, Paginator};
use crate::types::{Collection, Record};
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// One collection after it was fetched and persisted
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCollection {
    /// Which collection
    pub collection: Collection,
    /// Records in page order
    pub records: Vec<Record>,
    /// File the records were written to
    pub path: PathBuf,
    /// False when a page exhausted its retries and later pages were skipped
    pub complete: bool,
}

impl FetchedCollection {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were fetched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How a fetch run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Both collections were fetched and are non-empty
    Completed {
        /// Exploitable HIGH / CRITICAL vulnerabilities
        vulnerabilities: FetchedCollection,
        /// Publicly exposed assets
        assets: FetchedCollection,
    },
    /// The named collection was empty, so nothing after it ran
    HaltedEmpty(Collection),
}

impl RunOutcome {
    /// Check if the run got through both collections
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Fetches the vulnerability and asset collections one after the other
pub struct FetchOrchestrator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    base_url: Url,
    writer: JsonWriter,
}

impl<'a, S: PageSource + ?Sized> FetchOrchestrator<'a, S> {
    /// Create an orchestrator for a tenant base URL
    pub fn new(source: &'a S, base_url: Url, writer: JsonWriter) -> Self {
        Self {
            source,
            base_url,
            writer,
        }
    }

    /// Fetch vulnerabilities, then assets.
    ///
    /// Each collection is written to disk before its emptiness is checked, so a
    /// halted run still leaves an empty array behind.
    pub async fn run(&self) -> Result<RunOutcome> {
        let vulnerabilities = self.fetch_collection(Collection::Vulnerabilities).await?;
        if vulnerabilities.is_empty() {
            info!("No vulnerabilities found. Exiting...");
            return Ok(RunOutcome::HaltedEmpty(Collection::Vulnerabilities));
        }

        let assets = self.fetch_collection(Collection::Assets).await?;
        if assets.is_empty() {
            info!("No assets found. Exiting...");
            return Ok(RunOutcome::HaltedEmpty(Collection::Assets));
        }

        Ok(RunOutcome::Completed {
            vulnerabilities,
            assets,
        })
    }

    /// Fetch and persist a single collection
    pub async fn fetch_collection(&self, collection: Collection) -> Result<FetchedCollection> {
        info!("Fetching {}...", collection.description());

        let url = self
            .base_url
            .join(collection.path().trim_start_matches('/'))?;
        let result = Paginator::new(self.source)
            .fetch_all(&url, &collection.filters())
            .await?;

        let complete = result.is_complete();
        if !complete {
            warn!(
                "Fetch of {} stopped early after {} pages; saving partial results",
                collection, result.pages
            );
        }

        let records = result.into_records();
        let path = self.writer.write(collection, &records)?;
        info!(
            "{} {} fetched and saved to {}",
            records.len(),
            collection,
            path.display()
        );

        Ok(FetchedCollection {
            collection,
            records,
            path,
            complete,
        })
    }
}
