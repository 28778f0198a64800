//! 列名・フィルタのパースエラー

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
