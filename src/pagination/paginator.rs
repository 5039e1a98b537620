//! Page-number paginator driven by `meta.hasNextPage`

use super::types::{
    FetchOutcome, PageRequest, PageSource, PaginatedResult, PaginationState, PaginatorState,
};
use crate::error::Result;
use crate::types::{Record, StringMap, PER_PAGE};
use tracing::{debug, warn};
use url::Url;

/// Walks a collection page by page until the server reports no further page
/// or a page exhausts its retries.
///
/// Pages are requested strictly one after another, so records come back in
/// page order with each page appended exactly once.
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    per_page: u32,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    /// Create a paginator over a page source
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            per_page: PER_PAGE,
        }
    }

    /// Override the page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Fetch every page of a collection.
    ///
    /// Returns the records of all pages fetched before the run stopped. A page
    /// that exhausts its retries contributes nothing and stops the walk; an
    /// undecodable page is returned as an error.
    pub async fn fetch_all(&self, url: &Url, params: &StringMap) -> Result<PaginatedResult> {
        let mut state = PaginationState::new();
        let mut records: Vec<Record> = Vec::new();

        while !state.status.is_terminal() {
            match state.status {
                PaginatorState::FetchingPage => {
                    let request =
                        PageRequest::new(url.clone(), params.clone(), state.page, self.per_page);

                    match self.source.fetch_page(&request).await? {
                        FetchOutcome::Page(page) => {
                            let has_next = page.has_next_page();
                            let data = page.into_records();
                            debug!(
                                page = state.page,
                                records = data.len(),
                                has_next,
                                "Page fetched"
                            );
                            state.page_fetched(data.len(), has_next);
                            records.extend(data);
                        }
                        FetchOutcome::RetriesExhausted {
                            attempts,
                            last_error,
                        } => {
                            warn!(
                                "Max retries exceeded on page {} after {} attempts ({}). Exiting...",
                                state.page, attempts, last_error
                            );
                            state.abort();
                        }
                    }
                }
                PaginatorState::Advancing => state.advance(),
                PaginatorState::Done | PaginatorState::Aborted => {}
            }
        }

        debug!(
            pages = state.pages_fetched,
            records = state.total_fetched,
            status = ?state.status,
            "Pagination finished"
        );

        Ok(PaginatedResult {
            records,
            pages: state.pages_fetched,
            state: state.status,
        })
    }
}
