//! アップロード進捗バー表示

use crate::uploader::UploadReporter;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use monitor_panel_common::{UploadEntry, UploadStatus};
use parking_lot::Mutex;
use std::collections::HashMap;

/// ファイルごとに1本、アップロード開始時に生成
pub struct BarReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:30!} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadReporter for BarReporter {
    fn on_started(&self, entry: &UploadEntry) {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(Self::style());
        bar.set_prefix(entry.file_name.clone());
        bar.set_message(entry.status.as_str());
        self.bars.lock().insert(entry.file_name.clone(), bar);
    }

    fn on_progress(&self, entry: &UploadEntry) {
        if let Some(bar) = self.bars.lock().get(&entry.file_name) {
            bar.set_position(entry.progress as u64);
        }
    }

    fn on_finished(&self, entry: &UploadEntry) {
        if let Some(bar) = self.bars.lock().remove(&entry.file_name) {
            bar.set_position(entry.progress as u64);
            let message = match entry.status {
                UploadStatus::Succeeded => "✔ succeeded",
                _ => "✗ failed",
            };
            bar.finish_with_message(message);
        }
    }
}
