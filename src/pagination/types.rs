//! Pagination types and traits
//!
//! Defines the request/response shapes of one page, the outcome of a retried
//! page fetch, and the state tracked while walking a collection.

use crate::error::{Error, Result};
use crate::types::{Record, StringMap, FIRST_PAGE};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size
pub const PER_PAGE_PARAM: &str = "perPage";

// ============================================================================
// Page Request
// ============================================================================

/// Everything needed to request one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Absolute collection URL
    pub url: Url,
    /// Caller-supplied filters, sent on every page
    pub params: StringMap,
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub per_page: u32,
}

impl PageRequest {
    /// Create a request for a single page
    pub fn new(url: Url, params: StringMap, page: u32, per_page: u32) -> Self {
        Self {
            url,
            params,
            page,
            per_page,
        }
    }

    /// Query pairs for the request, sorted by key.
    ///
    /// `page` and `perPage` win over caller filters with the same name.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut merged = self.params.clone();
        merged.insert(PAGE_PARAM.to_string(), self.page.to_string());
        merged.insert(PER_PAGE_PARAM.to_string(), self.per_page.to_string());

        let mut pairs: Vec<(String, String)> = merged.into_iter().collect();
        pairs.sort();
        pairs
    }
}

// ============================================================================
// Page Response
// ============================================================================

/// Continuation metadata of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Whether another page follows
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: Option<bool>,
}

/// One decoded page
///
/// Records are kept as opaque JSON; only `data` and `meta.hasNextPage` are read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageResponse {
    /// Records on this page
    #[serde(default)]
    pub data: Option<Vec<Record>>,
    /// Continuation metadata
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl PageResponse {
    /// Create a page from records and a continuation flag
    pub fn new(data: Vec<Record>, has_next_page: bool) -> Self {
        Self {
            data: Some(data),
            meta: Some(PageMeta {
                has_next_page: Some(has_next_page),
            }),
        }
    }

    /// Decode a response body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| Error::decode(format!("invalid page body: {e}")))
    }

    /// Absent flag or absent `meta` means no further page
    pub fn has_next_page(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|m| m.has_next_page)
            .unwrap_or(false)
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Whether this page carries no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the records, treating a missing `data` as empty
    pub fn into_records(self) -> Vec<Record> {
        self.data.unwrap_or_default()
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Result of fetching one page with retries
///
/// Fatal failures (an undecodable body) are reported through `Err` instead.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was fetched and decoded
    Page(PageResponse),
    /// Every attempt failed with a transient error
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        last_error: Error,
    },
}

/// Anything that can fetch a single page with its own retry policy
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page, retrying transient failures
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchOutcome>;
}

// ============================================================================
// Pagination State
// ============================================================================

/// Paginator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginatorState {
    /// Requesting the current page
    #[default]
    FetchingPage,
    /// Previous page reported a successor
    Advancing,
    /// Last page reached
    Done,
    /// A page exhausted its retries; earlier pages are kept
    Aborted,
}

impl PaginatorState {
    /// Check if pagination has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// Tracks pagination state during one paginated fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number
    pub page: u32,
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Current state
    pub status: PaginatorState,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            pages_fetched: 0,
            total_fetched: 0,
            status: PaginatorState::FetchingPage,
        }
    }
}

impl PaginationState {
    /// Create a new pagination state at the first page
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully fetched page
    pub fn page_fetched(&mut self, records: usize, has_next_page: bool) {
        self.pages_fetched += 1;
        self.total_fetched += records as u64;
        self.status = if has_next_page {
            PaginatorState::Advancing
        } else {
            PaginatorState::Done
        };
    }

    /// Move on to the next page
    pub fn advance(&mut self) {
        self.page += 1;
        self.status = PaginatorState::FetchingPage;
    }

    /// Stop after the current page failed
    pub fn abort(&mut self) {
        self.status = PaginatorState::Aborted;
    }
}

/// Records gathered by one paginated fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult {
    /// Records in page order
    pub records: Vec<Record>,
    /// Pages fetched successfully
    pub pages: u32,
    /// Terminal state, `Done` or `Aborted`
    pub state: PaginatorState,
}

impl PaginatedResult {
    /// Check if every page was fetched
    pub fn is_complete(&self) -> bool {
        self.state == PaginatorState::Done
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were gathered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
