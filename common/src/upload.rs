//! アップロード選択状態
//!
//! キューはファイル名がキー。エントリごとにステータスと進捗を持ち、
//! バッチ全体のステータスはない。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Queued,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Queued => "queued",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEntry {
    pub file_name: String,
    pub size: u64,
    /// 0-100
    pub progress: u8,
    pub status: UploadStatus,
}

/// `round(sent / total * 100)`（上限100、total が 0 なら `None`）
pub fn progress_percent(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (sent as f64 * 100.0 / total as f64).round();
    Some(percent.clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, Default)]
pub struct UploadQueue {
    entries: Vec<UploadEntry>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, file_name: &str) -> Option<&UploadEntry> {
        self.entries.iter().find(|e| e.file_name == file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.get(file_name).is_some()
    }

    fn get_mut(&mut self, file_name: &str) -> Option<&mut UploadEntry> {
        self.entries.iter_mut().find(|e| e.file_name == file_name)
    }

    /// 未選択の候補 `(file_name, size)` を追加
    ///
    /// キュー内や同じバッチ内の重複は通知なしで除外。
    /// 受け付けた名前を順に返す。
    pub fn select<I, S>(&mut self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut accepted = Vec::new();
        for (file_name, size) in candidates {
            let file_name = file_name.into();
            if self.contains(&file_name) {
                continue;
            }
            self.entries.push(UploadEntry {
                file_name: file_name.clone(),
                size,
                progress: 0,
                status: UploadStatus::Queued,
            });
            accepted.push(file_name);
        }
        accepted
    }

    /// エントリをアップロード中にし、進捗をリセット
    pub fn begin(&mut self, file_name: &str) -> Option<&UploadEntry> {
        let entry = self.get_mut(file_name)?;
        entry.status = UploadStatus::Uploading;
        entry.progress = 0;
        Some(entry)
    }

    /// 進捗を反映（後戻りはしない）
    pub fn record_progress(&mut self, file_name: &str, sent: u64, total: u64) -> Option<&UploadEntry> {
        let percent = progress_percent(sent, total)?;
        let entry = self.get_mut(file_name)?;
        if entry.status == UploadStatus::Uploading && percent > entry.progress {
            entry.progress = percent;
        }
        Some(entry)
    }

    pub fn complete(&mut self, file_name: &str) -> Option<&UploadEntry> {
        let entry = self.get_mut(file_name)?;
        entry.progress = 100;
        entry.status = UploadStatus::Succeeded;
        Some(entry)
    }

    pub fn fail(&mut self, file_name: &str) -> Option<&UploadEntry> {
        let entry = self.get_mut(file_name)?;
        entry.status = UploadStatus::Failed;
        Some(entry)
    }

    pub fn count(&self, status: UploadStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 200), Some(0));
        assert_eq!(progress_percent(1, 200), Some(1)); // 0.5 rounds up
        assert_eq!(progress_percent(100, 200), Some(50));
        assert_eq!(progress_percent(200, 200), Some(100));
        assert_eq!(progress_percent(300, 200), Some(100));
        assert_eq!(progress_percent(5, 0), None);
    }

    #[test]
    fn test_select_dedupes_within_batch() {
        let mut queue = UploadQueue::new();
        let accepted = queue.select([("a.mp4", 10), ("a.mp4", 10)]);
        assert_eq!(accepted, vec!["a.mp4"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.entries()[0].status, UploadStatus::Queued);
        assert_eq!(queue.entries()[0].progress, 0);
    }

    #[test]
    fn test_select_dedupes_against_existing() {
        let mut queue = UploadQueue::new();
        queue.select([("a.mp4", 10)]);
        queue.complete("a.mp4");

        let accepted = queue.select([("a.mp4", 99), ("b.mp4", 20)]);
        assert_eq!(accepted, vec!["b.mp4"]);
        assert_eq!(queue.len(), 2);
        // 既存エントリは変更されない
        let a = queue.get("a.mp4").unwrap();
        assert_eq!(a.size, 10);
        assert_eq!(a.status, UploadStatus::Succeeded);
    }

    #[test]
    fn test_progress_never_regresses() {
        let mut queue = UploadQueue::new();
        queue.select([("clip.mov", 100)]);
        queue.begin("clip.mov");

        queue.record_progress("clip.mov", 60, 100);
        queue.record_progress("clip.mov", 40, 100);
        assert_eq!(queue.get("clip.mov").unwrap().progress, 60);

        queue.record_progress("clip.mov", 80, 0);
        assert_eq!(queue.get("clip.mov").unwrap().progress, 60);
    }

    #[test]
    fn test_progress_ignored_unless_uploading() {
        let mut queue = UploadQueue::new();
        queue.select([("clip.mov", 100)]);
        queue.record_progress("clip.mov", 50, 100);
        assert_eq!(queue.get("clip.mov").unwrap().progress, 0);
    }

    #[test]
    fn test_lifecycle_success() {
        let mut queue = UploadQueue::new();
        queue.select([("a.mp4", 10)]);
        let entry = queue.begin("a.mp4").unwrap();
        assert_eq!(entry.status, UploadStatus::Uploading);

        let entry = queue.complete("a.mp4").unwrap();
        assert_eq!(entry.progress, 100);
        assert_eq!(entry.status, UploadStatus::Succeeded);
        assert!(entry.status.is_finished());
    }

    #[test]
    fn test_lifecycle_failure_keeps_progress() {
        let mut queue = UploadQueue::new();
        queue.select([("a.mp4", 10), ("b.mp4", 10)]);
        queue.begin("a.mp4");
        queue.record_progress("a.mp4", 3, 10);
        let entry = queue.fail("a.mp4").unwrap();
        assert_eq!(entry.status, UploadStatus::Failed);
        assert_eq!(entry.progress, 30);

        assert_eq!(queue.count(UploadStatus::Failed), 1);
        assert_eq!(queue.count(UploadStatus::Queued), 1);
    }

    #[test]
    fn test_unknown_entry() {
        let mut queue = UploadQueue::new();
        assert!(queue.begin("missing").is_none());
        assert!(queue.complete("missing").is_none());
        assert!(queue.fail("missing").is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(UploadStatus::Uploading.to_string(), "uploading");
        assert!(!UploadStatus::Queued.is_finished());
    }
}
