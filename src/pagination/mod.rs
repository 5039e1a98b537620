//! Pagination module
//!
//! Walks a page-numbered collection (`page` / `perPage` query parameters)
//! until the server reports `meta.hasNextPage = false`.
//!
//! # Overview
//!
//! The paginator owns the accumulated records and the state machine
//! (`FetchingPage` → `Advancing` → ... → `Done` | `Aborted`). Fetching and
//! retrying a single page is delegated to a [`PageSource`], normally the
//! HTTP client.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{
    FetchOutcome, PageMeta, PageRequest, PageResponse, PageSource, PaginatedResult,
    PaginationState, PaginatorState, PAGE_PARAM, PER_PAGE_PARAM,
};

#[cfg(test)]
mod tests;
