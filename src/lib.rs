//! Monitor Panel
//!
//! 放送出稿レポートAPIのクライアント。レポート行の取得、
//! テーブル表示の導出、ファイルごとの進捗付きメディアアップロード。

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod monitor;
pub mod params_store;
pub mod progress;
pub mod render;
pub mod scanner;
pub mod uploader;
