//! 順序が入れ替わったレスポンスのテスト

use monitor_panel::api::ReportSource;
use monitor_panel::error::{MonitorError, Result};
use monitor_panel::monitor::{RefreshOutcome, ReportMonitor};
use monitor_panel_common::{FilterParams, ReportRow, ReportTable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// 最初の取得はゲート待ちの後に古いデータを返し、以降は即座に返す
struct GatedSource {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: AtomicUsize,
}

impl GatedSource {
    fn new(gate: oneshot::Receiver<()>) -> Self {
        Self {
            gate: Mutex::new(Some(gate)),
            calls: AtomicUsize::new(0),
        }
    }
}

fn titled(title: &str) -> ReportRow {
    ReportRow {
        title: title.into(),
        ..Default::default()
    }
}

impl ReportSource for GatedSource {
    async fn fetch(&self, _params: &FilterParams) -> Result<Vec<ReportRow>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            return Ok(vec![titled("old")]);
        }
        Ok(vec![titled("new"), titled("newer")])
    }
}

#[tokio::test]
async fn test_late_response_is_discarded() {
    let (release, gate) = oneshot::channel();
    let monitor = ReportMonitor::new(GatedSource::new(gate), ReportTable::default());
    let params = FilterParams::new().with_query("news");

    let slow = monitor.refresh(&params);
    let fast = async {
        let outcome = monitor.refresh(&params).await;
        let _ = release.send(());
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast.unwrap(), RefreshOutcome::Applied(2));
    assert_eq!(slow.unwrap(), RefreshOutcome::Stale);

    let titles: Vec<String> = monitor.with_table(|t| t.rows().iter().map(|r| r.title.clone()).collect());
    assert_eq!(titles, vec!["new", "newer"]);
    assert_eq!(monitor.insertions_label(), "Insertions - 2");
}

#[tokio::test]
async fn test_sequential_refreshes_all_apply() {
    let (release, gate) = oneshot::channel();
    release.send(()).unwrap();
    let monitor = ReportMonitor::new(GatedSource::new(gate), ReportTable::default());

    let first = monitor.refresh(&FilterParams::new()).await.unwrap();
    let second = monitor.refresh(&FilterParams::new()).await.unwrap();
    assert_eq!(first, RefreshOutcome::Applied(1));
    assert_eq!(second, RefreshOutcome::Applied(2));
}

#[tokio::test]
async fn test_refresh_clears_selection_and_page() {
    let (release, gate) = oneshot::channel();
    release.send(()).unwrap();
    let rows: Vec<ReportRow> = (0..30).map(|i| titled(&format!("row {}", i))).collect();
    let monitor = ReportMonitor::new(GatedSource::new(gate), ReportTable::new(rows));

    monitor.with_table(|t| {
        t.set_row_selection([1, 2]);
        t.set_page_index(2);
    });
    monitor.refresh(&FilterParams::new()).await.unwrap();

    monitor.with_table(|t| {
        assert!(t.selected_rows().is_empty());
        assert_eq!(t.page_index(), 0);
    });
}

/// 最初の取得はゲート待ちの後に失敗し、以降は成功する
struct FailingFirstSource {
    inner: GatedSource,
}

impl ReportSource for FailingFirstSource {
    async fn fetch(&self, params: &FilterParams) -> Result<Vec<ReportRow>> {
        let first = self.inner.calls.load(Ordering::SeqCst) == 0;
        let rows = self.inner.fetch(params).await?;
        if first {
            return Err(MonitorError::FetchFailed);
        }
        Ok(rows)
    }
}

#[tokio::test]
async fn test_superseded_failure_is_stale() {
    let (release, gate) = oneshot::channel();
    let source = FailingFirstSource {
        inner: GatedSource::new(gate),
    };
    let monitor = ReportMonitor::new(source, ReportTable::default());
    let params = FilterParams::new();

    let slow = monitor.refresh(&params);
    let fast = async {
        let outcome = monitor.refresh(&params).await;
        let _ = release.send(());
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast.unwrap(), RefreshOutcome::Applied(2));
    assert_eq!(slow.unwrap(), RefreshOutcome::Stale);
    assert_eq!(monitor.insertions_label(), "Insertions - 2");
}
