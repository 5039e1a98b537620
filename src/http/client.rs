//! HTTP client with retry
//!
//! Provides the page fetcher used by the paginator:
//! - One GET per attempt with the bearer token and query parameters attached
//! - Error classification for retry decisions
//! - Linear backoff between attempts

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pagination::{FetchOutcome, PageRequest, PageResponse, PageSource};
use crate::types::RetryPolicy;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Attempt budget and backoff per page
    pub retry: RetryPolicy,
    /// Bearer token sent as `Authorization: Bearer <token>`
    pub bearer_token: Option<String>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            bearer_token: None,
            default_headers: HashMap::new(),
            user_agent: format!("plerion-report/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Derive the client config from the application config
    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .timeout(config.timeout)
            .retry(config.retry)
            .bearer_token(config.api_key.clone())
            .build()
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("default_headers", &self.default_headers.keys())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = Some(token.into());
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client that fetches pages with retry
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Make a single GET for one page, without retrying.
    ///
    /// Non-success statuses become `Error::HttpStatus`, transport failures
    /// `Error::Http`, and a body that is not a page object `Error::Decode`.
    pub async fn get_page(&self, request: &PageRequest) -> Result<PageResponse> {
        let mut req = self
            .client
            .get(request.url.clone())
            .query(&request.query_pairs())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref token) = self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        debug!(
            "Request succeeded: GET {} page={} ({} bytes)",
            request.url,
            request.page,
            body.len()
        );
        PageResponse::from_slice(&body)
    }

    /// Fetch one page, retrying transient failures with linear backoff.
    ///
    /// Each failed attempt `n` is followed by a wait of `retry_delay * n`. Once
    /// the budget is spent the outcome is `RetriesExhausted`; decode failures
    /// are returned immediately as errors.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<FetchOutcome> {
        let max_retries = self.config.retry.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=max_retries {
            info!("Fetching page {}...", request.page);

            match self.get_page(request).await {
                Ok(page) => return Ok(FetchOutcome::Page(page)),
                Err(e) if e.is_retryable() => {
                    let delay = self.config.retry.backoff(attempt);
                    warn!(
                        "Request failed: {}, attempt {}/{}, waiting {:?}",
                        e, attempt, max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(FetchOutcome::RetriesExhausted {
            attempts: max_retries,
            last_error: last_error
                .unwrap_or_else(|| Error::Other("no attempt was made".to_string())),
        })
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchOutcome> {
        HttpClient::fetch_page(self, request).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
