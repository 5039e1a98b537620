//! Common types used throughout plerion-report
//!
//! This module contains shared type definitions, type aliases,
//! and the fixed fetch policy used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Type Aliases
// ============================================================================

/// An opaque API record, passed through verbatim
pub type Record = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Policy Constants
// ============================================================================

/// Records requested per page
pub const PER_PAGE: u32 = 500;

/// First page number
pub const FIRST_PAGE: u32 = 1;

/// Attempts allowed per page
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for the linear backoff
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// Retry Policy
// ============================================================================

/// Retry budget and linear backoff for a single page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page (not retries on top of the first attempt)
    pub max_retries: u32,
    /// Base delay; the n-th retry waits `retry_delay * n`
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Delay after failed attempt `attempt` (1-indexed)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

// ============================================================================
// Collections
// ============================================================================

/// The two collections pulled from the API, in fetch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Exploitable HIGH / CRITICAL vulnerabilities
    Vulnerabilities,
    /// Publicly exposed assets
    Assets,
}

impl Collection {
    /// API path relative to the tenant base URL
    pub fn path(self) -> &'static str {
        match self {
            Collection::Vulnerabilities => "/v1/tenant/vulnerabilities",
            Collection::Assets => "/v1/tenant/assets",
        }
    }

    /// Endpoint-specific filters sent on every page request
    pub fn filters(self) -> StringMap {
        let pairs: &[(&str, &str)] = match self {
            Collection::Vulnerabilities => &[
                ("severityLevels", "HIGH,CRITICAL"),
                ("hasExploit", "true"),
            ],
            Collection::Assets => &[("isPubliclyExposed", "true")],
        };
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// File the collection is persisted to
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Vulnerabilities => "vulnerabilities.json",
            Collection::Assets => "assets.json",
        }
    }

    /// Human-readable description logged before the fetch starts
    pub fn description(self) -> &'static str {
        match self {
            Collection::Vulnerabilities => {
                "vulnerabilities with HIGH and CRITICAL severity levels"
            }
            Collection::Assets => "assets that are publicly exposed",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Vulnerabilities => write!(f, "vulnerabilities"),
            Collection::Assets => write!(f, "assets"),
        }
    }
}
