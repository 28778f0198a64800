//! レポート画面の状態
//!
//! フィルタ条件で行を取得し、テーブルに反映する。
//! 更新ごとに世代番号を取り、処理中に新しい更新が始まっていない
//! 場合のみレスポンスを反映する。遅れて届いた古いレスポンスが
//! 新しいデータを上書きすることはない。追い越された要求が失敗した
//! 場合も Stale として扱う。

use crate::api::ReportSource;
use crate::error::Result;
use monitor_panel_common::{FilterParams, ReportTable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// 行を置き換えた（新しい行数）
    Applied(usize),
    /// より新しい更新に追い越された（成否を問わず）。
    /// テーブルは変更しない
    Stale,
}

pub struct ReportMonitor<S> {
    source: S,
    table: Mutex<ReportTable>,
    generation: AtomicU64,
}

impl<S: ReportSource> ReportMonitor<S> {
    pub fn new(source: S, table: ReportTable) -> Self {
        Self {
            source,
            table: Mutex::new(table),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn refresh(&self, params: &FilterParams) -> Result<RefreshOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.source.fetch(params).await;

        let mut table = self.table.lock();
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(ticket, failed = result.is_err(), "discarding stale report response");
            return Ok(RefreshOutcome::Stale);
        }
        let rows = result?;

        let count = rows.len();
        table.set_rows(rows);
        Ok(RefreshOutcome::Applied(count))
    }

    /// テーブルに対して `f` を実行
    pub fn with_table<T>(&self, f: impl FnOnce(&mut ReportTable) -> T) -> T {
        f(&mut self.table.lock())
    }

    pub fn row_count(&self) -> usize {
        self.table.lock().rows().len()
    }

    pub fn insertions_label(&self) -> String {
        format!("Insertions - {}", self.row_count())
    }
}
