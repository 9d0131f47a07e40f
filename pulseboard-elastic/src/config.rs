//! Elastic client configuration.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Elastic client configuration.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    /// Cluster base URL, e.g. `https://example.es.io:9243`.
    pub base_url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

/// On-disk config shape: `{"url": "...", "auth": ["user", "pass"]}`.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    url: String,
    auth: Option<(String, String)>,
}

impl ElasticConfig {
    /// Create a new configuration for a single cluster URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load a configuration from a JSON file with `url` and optional
    /// `auth` (two-element `[username, password]` array) keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&raw)?;

        let mut config = Self::new(file.url);
        if let Some((username, password)) = file.auth {
            config = config.with_basic_auth(username, password);
        }
        Ok(config)
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ElasticConfig::new("http://localhost:9200")
            .with_basic_auth("ingester", "secret")
            .with_request_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://localhost:9200");
        assert_eq!(config.username.as_deref(), Some("ingester"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_from_file() {
        let path = std::env::temp_dir().join("pulseboard-elastic-config-test.json");
        std::fs::write(
            &path,
            r#"{"url": "https://cluster.example:9243", "auth": ["user", "pass"]}"#,
        )
        .unwrap();

        let config = ElasticConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.base_url, "https://cluster.example:9243");
        assert_eq!(config.username.as_deref(), Some("user"));
        assert_eq!(config.password.as_deref(), Some("pass"));
    }

    #[test]
    fn test_config_from_file_without_auth() {
        let path = std::env::temp_dir().join("pulseboard-elastic-config-noauth.json");
        std::fs::write(&path, r#"{"url": "http://localhost:9200"}"#).unwrap();

        let config = ElasticConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.base_url, "http://localhost:9200");
        assert!(config.username.is_none());
    }
}
