use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7777";
pub const BASE_URL_ENV: &str = "MONITOR_PANEL_API_URL";

/// 10 GiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub upload_path: String,
    pub page_size: usize,
    pub max_upload_bytes: u64,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
    /// `tracing` のフィルタ（例: `info`, `monitor_panel=debug`）
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            upload_path: "/upload".into(),
            page_size: monitor_panel_common::table::DEFAULT_PAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout_seconds: None,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// `~/.config/monitor-panel`
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MonitorError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("monitor-panel"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(MonitorError::Config(format!(
                "base URL must start with http:// or https://, got `{}`",
                url
            )));
        }
        self.base_url = trimmed.to_string();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:7777");
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_upload_bytes, 10_737_418_240);
        assert!(config.timeout_seconds.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base_url": "https://reports.example.com"}"#).unwrap();
        assert_eq!(config.base_url, "https://reports.example.com");
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.log_level, "info");
    }
}
