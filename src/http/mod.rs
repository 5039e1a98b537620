//! HTTP client module
//!
//! Provides the retrying page fetcher.
//!
//! # Features
//!
//! - **Automatic Retries**: fixed attempt budget per page
//! - **Linear Backoff**: `retry_delay * attempt` between attempts
//! - **Authentication**: bearer token on every request

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
