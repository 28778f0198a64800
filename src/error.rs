use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    /// レポート取得の失敗はすべてこれに集約（原因はログに出す）
    #[error("failed to fetch report data")]
    FetchFailed,

    #[error("Upload of {file_name} failed: {reason}")]
    Upload { file_name: String, reason: String },

    #[error("{file_name} is {size} bytes, above the {limit} byte upload limit")]
    FileTooLarge { file_name: String, size: u64, limit: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] monitor_panel_common::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
