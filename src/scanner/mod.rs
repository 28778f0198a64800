//! アップロード対象の収集
//!
//! 指定パスがファイルならそのまま、フォルダなら直下のファイルを対象とする
//! （ファイル名順、隠しファイルは除外）。

use crate::error::{MonitorError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// アップロード対象ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl MediaFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| MonitorError::FileNotFound(path.display().to_string()))?;
        if !metadata.is_file() {
            return Err(MonitorError::InvalidArgument(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
        })
    }
}

/// `folder` 直下のファイル一覧
pub fn scan_folder(folder: &Path) -> Result<Vec<MediaFile>> {
    if !folder.exists() {
        return Err(MonitorError::FileNotFound(folder.display().to_string()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || is_hidden(path) {
            continue;
        }

        files.push(MediaFile::from_path(path)?);
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(files)
}

/// 指定パスをアップロード候補に展開（引数の順序を保持）
pub fn collect_media(paths: &[PathBuf]) -> Result<Vec<MediaFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_folder(path)?);
        } else {
            files.push(MediaFile::from_path(path)?);
        }
    }
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
