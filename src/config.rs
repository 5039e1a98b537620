//! Configuration loaded from the JSON config file
//!
//! The file is a flat JSON object. Only `PlerionURL` and `PlerionAPIKey` are
//! required; the remaining keys tune the fetch policy and default to the fixed
//! values the tool has always used.

use crate::error::{Error, Result};
use crate::types::RetryPolicy;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

// ============================================================================
// On-disk Shape
// ============================================================================

/// Config file as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigFile {
    #[serde(rename = "PlerionURL")]
    plerion_url: Option<String>,

    #[serde(rename = "PlerionAPIKey")]
    plerion_api_key: Option<String>,

    #[serde(default)]
    max_retries: Option<u32>,

    #[serde(default)]
    retry_delay_seconds: Option<f64>,

    #[serde(default)]
    timeout_seconds: Option<u64>,
}

// ============================================================================
// Validated Config
// ============================================================================

/// Validated runtime configuration
#[derive(Clone)]
pub struct Config {
    /// Tenant base URL, always with a scheme and a trailing slash
    pub base_url: Url,
    /// Opaque bearer token
    pub api_key: String,
    /// Per-page retry policy
    pub retry: RetryPolicy,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Build a config from a host (or full base URL) and an API key
    pub fn new(plerion_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(plerion_url)?,
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Load config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json_str(&content)
    }

    /// Parse config from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;

        let url = file
            .plerion_url
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::missing_field("PlerionURL"))?;
        let api_key = file
            .plerion_api_key
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field("PlerionAPIKey"))?;

        let mut config = Self::new(&url, api_key)?;

        if let Some(max_retries) = file.max_retries {
            if max_retries == 0 {
                return Err(Error::invalid_value("MaxRetries", "must be at least 1"));
            }
            config.retry.max_retries = max_retries;
        }

        if let Some(delay) = file.retry_delay_seconds {
            config.retry.retry_delay = Duration::try_from_secs_f64(delay)
                .map_err(|e| Error::invalid_value("RetryDelaySeconds", e.to_string()))?;
        }

        if let Some(timeout) = file.timeout_seconds {
            if timeout == 0 {
                return Err(Error::invalid_value("TimeoutSeconds", "must be positive"));
            }
            config.timeout = Duration::from_secs(timeout);
        }

        Ok(config)
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `PlerionURL` is a bare hostname; `https://` is assumed unless a scheme is given.
fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim().trim_end_matches('/');
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    // Trailing slash so that `join` appends rather than replaces the last segment
    let url = Url::parse(&format!("{with_scheme}/"))?;
    if url.host_str().is_none() {
        return Err(Error::invalid_value("PlerionURL", "missing host"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_MAX_RETRIES;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_json_str(
            r#"{"PlerionURL": "au.api.plerion.com", "PlerionAPIKey": "secret"}"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://au.api.plerion.com/");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.retry.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_with_overrides() {
        let config = Config::from_json_str(
            r#"{
                "PlerionURL": "http://localhost:8080/",
                "PlerionAPIKey": "k",
                "MaxRetries": 5,
                "RetryDelaySeconds": 0.5,
                "TimeoutSeconds": 10
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.retry_delay, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_fields() {
        let err = Config::from_json_str(r#"{"PlerionAPIKey": "k"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "PlerionURL"));

        let err = Config::from_json_str(r#"{"PlerionURL": "example.com"}"#).unwrap_err();
        assert!(
            matches!(err, Error::MissingConfigField { ref field } if field == "PlerionAPIKey")
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_json_str(
            r#"{"PlerionURL": "example.com", "PlerionAPIKey": "k", "MaxRetries": 0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));

        let err = Config::from_json_str(
            r#"{"PlerionURL": "example.com", "PlerionAPIKey": "k", "RetryDelaySeconds": -1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here/config.json").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"PlerionURL": "example.com", "PlerionAPIKey": "abc"}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_key, "abc");
    }

    #[test]
    fn test_endpoint() {
        let config = Config::new("example.com", "k").unwrap();
        assert_eq!(
            config.endpoint("/v1/tenant/assets").unwrap().as_str(),
            "https://example.com/v1/tenant/assets"
        );

        let config = Config::new("http://127.0.0.1:9000/base", "k").unwrap();
        assert_eq!(
            config.endpoint("/v1/tenant/assets").unwrap().as_str(),
            "http://127.0.0.1:9000/base/v1/tenant/assets"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("example.com", "super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
