//! レポート・アップロードAPIアクセス

mod client;
mod reports;
mod upload;

pub use client::ApiClient;
pub use reports::{fetch_report_data, ReportSource, MONITOR_PATH};
pub use upload::{HttpUploader, MediaUploader, UPLOAD_FIELD};
