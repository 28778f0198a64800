//! アップロード制御モジュール
//!
//! 選択したファイルを1つずつ順番にアップロードする。
//! 前のアップロード完了を待ってから次を開始し、失敗はそのエントリだけに
//! 記録して残りを続行する。

use crate::api::MediaUploader;
use crate::scanner::MediaFile;
use monitor_panel_common::{UploadEntry, UploadQueue, UploadStatus};
use tracing::{debug, error, info};

/// アップロード状態の変化を受け取る
pub trait UploadReporter {
    fn on_started(&self, _entry: &UploadEntry) {}
    fn on_progress(&self, _entry: &UploadEntry) {}
    fn on_finished(&self, _entry: &UploadEntry) {}
}

/// 何もしないレポーター
pub struct NoopReporter;

impl UploadReporter for NoopReporter {}

pub struct UploadController<U> {
    uploader: U,
    queue: UploadQueue,
}

impl<U: MediaUploader> UploadController<U> {
    pub fn new(uploader: U) -> Self {
        Self {
            uploader,
            queue: UploadQueue::new(),
        }
    }

    pub fn entries(&self) -> &[UploadEntry] {
        self.queue.entries()
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    /// ファイルを選択に追加し、新規に受け付けたものを順にアップロード
    ///
    /// 受け付けたファイル名を返す。選択済みの名前のファイルは
    /// 通知なしで除外。
    pub async fn select_files<R: UploadReporter>(&mut self, files: Vec<MediaFile>, reporter: &R) -> Vec<String> {
        let accepted = self
            .queue
            .select(files.iter().map(|f| (f.file_name.clone(), f.size)));

        if accepted.len() < files.len() {
            debug!(skipped = files.len() - accepted.len(), "duplicate file names ignored");
        }

        for name in &accepted {
            // 同名の最初の候補がキューに入ったもの
            if let Some(file) = files.iter().find(|f| &f.file_name == name) {
                self.upload_one(file, reporter).await;
            }
        }

        accepted
    }

    /// 1ファイルをアップロードし最終ステータスを返す
    pub async fn upload_one<R: UploadReporter>(&mut self, file: &MediaFile, reporter: &R) -> UploadStatus {
        let name = file.file_name.as_str();
        if !self.queue.contains(name) {
            self.queue.select([(name, file.size)]);
        }

        if let Some(entry) = self.queue.begin(name) {
            reporter.on_started(entry);
        }

        let queue = &mut self.queue;
        let result = self
            .uploader
            .upload(file, &mut |sent, total| {
                if let Some(entry) = queue.record_progress(name, sent, total) {
                    reporter.on_progress(entry);
                }
            })
            .await;

        let entry = match result {
            Ok(()) => {
                info!(file = name, size = file.size, "upload succeeded");
                self.queue.complete(name)
            }
            Err(e) => {
                error!(file = name, error = %e, "upload failed");
                self.queue.fail(name)
            }
        };

        match entry {
            Some(entry) => {
                reporter.on_finished(entry);
                entry.status
            }
            None => UploadStatus::Failed,
        }
    }
}
