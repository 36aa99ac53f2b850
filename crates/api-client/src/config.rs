//! Configuration for the Waypost API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default production API URL
const DEFAULT_API_URL: &str = "https://api.waypost.dev/v1";

/// Client configuration
///
/// Holds everything the client needs to issue authenticated requests: the
/// base URL, the bearer key, default headers merged into every call, and an
/// optional transport timeout. All of it is fixed at construction; the
/// client never mutates its configuration afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the pin API (no trailing slash expected)
    pub api_url: String,
    /// Bearer key, three dot-separated segments
    pub key: String,
    /// Default headers applied to every request. These override per-call
    /// headers; `Authorization` and `Content-Type` are forced by the client
    /// and override both.
    #[serde(default)]
    pub default_headers: Vec<(String, String)>,
    /// Transport-level request timeout. `None` means the transport default
    /// (no timeout applied by this client).
    #[serde(default, with = "timeout_serde")]
    pub timeout: Option<Duration>,
}

mod timeout_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        timeout: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        timeout.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            key: String::new(),
            default_headers: Vec::new(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given base URL and bearer key
    pub fn new(api_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `WAYPOST_API_URL`: Base URL of the pin API (optional, defaults to production)
    /// - `WAYPOST_API_KEY`: Bearer key (required)
    /// - `WAYPOST_TIMEOUT_SECS`: Transport timeout in seconds (optional)
    pub fn from_env() -> ApiResult<Self> {
        let api_url =
            env::var("WAYPOST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let key =
            env::var("WAYPOST_API_KEY").map_err(|_| ApiError::missing_env("WAYPOST_API_KEY"))?;

        let timeout = env::var("WAYPOST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            key,
            default_headers: Vec::new(),
            timeout,
        })
    }

    /// Builder-style method to set the base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Builder-style method to set the bearer key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder-style method to add a default header
    ///
    /// Default headers are merged into every request and take precedence
    /// over per-call headers. The forced `Authorization` and `Content-Type`
    /// headers still win over anything supplied here.
    #[must_use]
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Builder-style method to set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    ///
    /// Local and synchronous; never contacts the network. The key check is
    /// structural only (three dot-separated segments), no signature
    /// verification is attempted.
    pub fn validate(&self) -> ApiResult<()> {
        if self.api_url.is_empty() {
            return Err(ApiError::config("api_url cannot be empty"));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ApiError::config(
                "api_url must start with http:// or https://",
            ));
        }

        if self.key.is_empty() {
            return Err(ApiError::config("key cannot be empty"));
        }

        if self.key.split('.').count() != 3 {
            return Err(ApiError::config(
                "key must be a bearer token with three dot-separated segments",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.api_url.contains("waypost.dev"));
        assert!(config.timeout.is_none());
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new("https://pins.example.com/v1", "aa.bb.cc")
            .with_timeout(Duration::from_secs(60))
            .with_default_header("X-Team", "platform");

        assert_eq!(config.api_url, "https://pins.example.com/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(
            config.default_headers,
            vec![("X-Team".to_string(), "platform".to_string())]
        );
    }

    #[test]
    fn test_three_segment_key_is_valid() {
        let config = ClientConfig::new("https://pins.example.com", "header.payload.signature");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let config = ClientConfig::new("https://pins.example.com", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wrong_segment_counts_are_rejected() {
        for key in ["nodots", "one.dot", "a.b.c.d"] {
            let config = ClientConfig::new("https://pins.example.com", key);
            assert!(config.validate().is_err(), "key {key:?} should be rejected");
        }
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let config = ClientConfig::new("", "a.b.c");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_url_is_rejected() {
        let config = ClientConfig::new("ftp://pins.example.com", "a.b.c");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ClientConfig::new("https://pins.example.com", "a.b.c")
            .with_timeout(Duration::from_secs(15));
        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_url, config.api_url);
        assert_eq!(back.timeout, Some(Duration::from_secs(15)));
    }
}
