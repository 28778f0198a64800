//! Monitor Panel 共通ライブラリ
//!
//! レポート行・フィルタ条件・テーブル状態・アップロード状態。
//! CLIなどのフロントエンドで共有し、ここではIOを行わない。

pub mod types;
pub mod column;
pub mod error;
pub mod filter;
pub mod table;
pub mod upload;

pub use types::{ReportRow, ReportResponse};
pub use column::{Column, ColumnKind};
pub use error::{Error, Result};
pub use filter::{FilterParam, FilterParams};
pub use table::{ColumnFilter, ReportTable, RowId, SortDirection, SortKey, TableViewState};
pub use upload::{progress_percent, UploadEntry, UploadQueue, UploadStatus};
