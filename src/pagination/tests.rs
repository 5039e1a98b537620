//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::types::{Record, StringMap, PER_PAGE};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

// ============================================================================
// Scripted Page Source
// ============================================================================

enum Step {
    Page(PageResponse),
    Exhausted,
    Fatal,
}

/// Replays a fixed script of outcomes and records every request it sees
struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchOutcome> {
        self.requests.lock().unwrap().push(request.clone());
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Page(page)) => Ok(FetchOutcome::Page(page)),
            Some(Step::Exhausted) => Ok(FetchOutcome::RetriesExhausted {
                attempts: 3,
                last_error: Error::http_status(503, "Service Unavailable"),
            }),
            Some(Step::Fatal) => Err(Error::decode("expected value at line 1 column 1")),
            None => panic!("unexpected request for page {}", request.page),
        }
    }
}

fn records(page: u32, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| json!({"id": format!("p{page}-{i}")}))
        .collect()
}

fn collection_url() -> Url {
    Url::parse("https://example.com/v1/tenant/vulnerabilities").unwrap()
}

fn vuln_filters() -> StringMap {
    let mut params = StringMap::new();
    params.insert("severityLevels".to_string(), "HIGH,CRITICAL".to_string());
    params.insert("hasExploit".to_string(), "true".to_string());
    params
}

// ============================================================================
// PageRequest Tests
// ============================================================================

#[test]
fn test_query_pairs_include_pagination() {
    let request = PageRequest::new(collection_url(), vuln_filters(), 3, 500);
    assert_eq!(
        request.query_pairs(),
        vec![
            ("hasExploit".to_string(), "true".to_string()),
            ("page".to_string(), "3".to_string()),
            ("perPage".to_string(), "500".to_string()),
            ("severityLevels".to_string(), "HIGH,CRITICAL".to_string()),
        ]
    );
}

#[test]
fn test_query_pairs_pagination_wins_on_collision() {
    let mut params = StringMap::new();
    params.insert("page".to_string(), "99".to_string());
    params.insert("perPage".to_string(), "10".to_string());

    let request = PageRequest::new(collection_url(), params, 2, 500);
    let pairs = request.query_pairs();

    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&("page".to_string(), "2".to_string())));
    assert!(pairs.contains(&("perPage".to_string(), "500".to_string())));
}

// ============================================================================
// PageResponse Tests
// ============================================================================

#[test]
fn test_page_response_decode() {
    let page = PageResponse::from_slice(
        br#"{"data": [{"id": 1}, {"id": 2}], "meta": {"hasNextPage": true, "total": 9}}"#,
    )
    .unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.has_next_page());
}

#[test]
fn test_page_response_missing_meta_is_last_page() {
    let page = PageResponse::from_slice(br#"{"data": [{"id": 1}]}"#).unwrap();
    assert!(!page.has_next_page());

    let page = PageResponse::from_slice(br#"{"data": [], "meta": {}}"#).unwrap();
    assert!(!page.has_next_page());

    let page = PageResponse::from_slice(br#"{"data": [], "meta": null}"#).unwrap();
    assert!(!page.has_next_page());
}

#[test]
fn test_page_response_missing_data_is_empty() {
    let page = PageResponse::from_slice(br#"{"meta": {"hasNextPage": false}}"#).unwrap();
    assert!(page.is_empty());
    assert!(page.into_records().is_empty());
}

#[test]
fn test_page_response_records_pass_through() {
    let body = json!({
        "data": [{"id": "a", "nested": {"x": [1, 2, 3]}, "flag": null}],
        "meta": {"hasNextPage": false}
    });
    let page = PageResponse::from_slice(body.to_string().as_bytes()).unwrap();
    assert_eq!(page.into_records(), vec![body["data"][0].clone()]);
}

#[test]
fn test_page_response_malformed_body() {
    let err = PageResponse::from_slice(b"<html>oops</html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(!err.is_retryable());

    let err = PageResponse::from_slice(b"[1, 2, 3]").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::new();
    assert_eq!(state.page, 1);
    assert_eq!(state.pages_fetched, 0);
    assert_eq!(state.total_fetched, 0);
    assert_eq!(state.status, PaginatorState::FetchingPage);
}

#[test]
fn test_pagination_state_transitions() {
    let mut state = PaginationState::new();

    state.page_fetched(500, true);
    assert_eq!(state.status, PaginatorState::Advancing);
    assert!(!state.status.is_terminal());

    state.advance();
    assert_eq!(state.page, 2);
    assert_eq!(state.status, PaginatorState::FetchingPage);

    state.page_fetched(10, false);
    assert_eq!(state.status, PaginatorState::Done);
    assert!(state.status.is_terminal());
    assert_eq!(state.pages_fetched, 2);
    assert_eq!(state.total_fetched, 510);
}

#[test]
fn test_pagination_state_abort() {
    let mut state = PaginationState::new();
    state.abort();
    assert_eq!(state.status, PaginatorState::Aborted);
    assert!(state.status.is_terminal());
}

// ============================================================================
// Paginator Tests
// ============================================================================

#[tokio::test]
async fn test_paginator_two_pages() {
    let source = ScriptedSource::new(vec![
        Step::Page(PageResponse::new(records(1, 500), true)),
        Step::Page(PageResponse::new(records(2, 10), false)),
    ]);

    let result = Paginator::new(&source)
        .fetch_all(&collection_url(), &vuln_filters())
        .await
        .unwrap();

    assert_eq!(result.len(), 510);
    assert_eq!(result.pages, 2);
    assert!(result.is_complete());
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_paginator_preserves_page_order() {
    let source = ScriptedSource::new(vec![
        Step::Page(PageResponse::new(records(1, 2), true)),
        Step::Page(PageResponse::new(records(2, 2), true)),
        Step::Page(PageResponse::new(records(3, 1), false)),
    ]);

    let result = Paginator::new(&source)
        .fetch_all(&collection_url(), &StringMap::new())
        .await
        .unwrap();

    let mut expected = records(1, 2);
    expected.extend(records(2, 2));
    expected.extend(records(3, 1));
    assert_eq!(result.into_records(), expected);
}

#[tokio::test]
async fn test_paginator_empty_first_page() {
    let source = ScriptedSource::new(vec![Step::Page(PageResponse::new(Vec::new(), false))]);

    let result = Paginator::new(&source)
        .fetch_all(&collection_url(), &StringMap::new())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(result.is_complete());
    assert_eq!(result.pages, 1);
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn test_paginator_keeps_earlier_pages_on_exhaustion() {
    let source = ScriptedSource::new(vec![
        Step::Page(PageResponse::new(records(1, 500), true)),
        Step::Exhausted,
    ]);

    let result = Paginator::new(&source)
        .fetch_all(&collection_url(), &vuln_filters())
        .await
        .unwrap();

    assert_eq!(result.state, PaginatorState::Aborted);
    assert!(!result.is_complete());
    assert_eq!(result.pages, 1);
    assert_eq!(result.into_records(), records(1, 500));
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_paginator_exhaustion_on_first_page() {
    let source = ScriptedSource::new(vec![Step::Exhausted]);

    let result = Paginator::new(&source)
        .fetch_all(&collection_url(), &StringMap::new())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.pages, 0);
    assert_eq!(result.state, PaginatorState::Aborted);
}

#[tokio::test]
async fn test_paginator_fatal_error_propagates() {
    let source = ScriptedSource::new(vec![
        Step::Page(PageResponse::new(records(1, 3), true)),
        Step::Fatal,
    ]);

    let err = Paginator::new(&source)
        .fetch_all(&collection_url(), &StringMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_paginator_sends_filters_on_every_page() {
    let source = ScriptedSource::new(vec![
        Step::Page(PageResponse::new(records(1, 1), true)),
        Step::Page(PageResponse::new(records(2, 1), true)),
        Step::Page(PageResponse::new(records(3, 1), false)),
    ]);

    Paginator::new(&source)
        .fetch_all(&collection_url(), &vuln_filters())
        .await
        .unwrap();

    let requests = source.requests();
    let pages: Vec<u32> = requests.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);

    for request in &requests {
        assert_eq!(request.params, vuln_filters());
        assert_eq!(request.per_page, PER_PAGE);
        assert_eq!(request.url, collection_url());
    }
}

#[tokio::test]
async fn test_paginator_custom_page_size() {
    let source = ScriptedSource::new(vec![Step::Page(PageResponse::new(records(1, 1), false))]);

    Paginator::new(&source)
        .with_per_page(50)
        .fetch_all(&collection_url(), &StringMap::new())
        .await
        .unwrap();

    assert_eq!(source.requests()[0].per_page, 50);
}
