use crate::config::Config;
use crate::error::{MonitorError, Result};
use reqwest::Client;
use std::time::Duration;

/// APIベースURLに紐づくHTTPクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("monitor-panel/", env!("CARGO_PKG_VERSION")));

        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| MonitorError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `base_url` 向けのデフォルト設定クライアント
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let config = Config {
            base_url: base_url.into(),
            ..Config::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// APIパスの絶対URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::with_base_url("http://localhost:7777/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:7777");
        assert_eq!(client.url("/monitor"), "http://localhost:7777/monitor");
        assert_eq!(client.url("upload"), "http://localhost:7777/upload");
    }

    #[test]
    fn test_base_url_from_config() {
        let config = Config {
            base_url: "https://reports.example.com/api".into(),
            timeout_seconds: Some(30),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/monitor"), "https://reports.example.com/api/monitor");
    }
}
