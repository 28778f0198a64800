//! レポート表の状態
//!
//! `ReportTable` は取得した行をそのまま保持し、表示内容は
//! 表示状態から導出する（列フィルタ → 安定な複数キーソート → ページ切り出し）。
//! キャッシュはせず、読むたびに行から導出し直す。

use crate::column::Column;
use crate::types::ReportRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 取得データ内の行位置
pub type RowId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "a" => Ok(SortDirection::Asc),
            "desc" | "d" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}. Use asc or desc", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: Column,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// クライアント側の表示状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableViewState {
    pub sorting: Vec<SortKey>,
    pub filters: Vec<ColumnFilter>,
    /// `Column::visible_by_default` の上書き
    pub visibility: BTreeMap<Column, bool>,
    pub selection: BTreeSet<RowId>,
    pub pagination: Pagination,
}

impl TableViewState {
    pub fn is_visible(&self, column: Column) -> bool {
        self.visibility
            .get(&column)
            .copied()
            .unwrap_or_else(|| column.visible_by_default())
    }

    pub fn sort_direction(&self, column: Column) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }
}

/// すべての有効フィルタを通る行（入力順）
pub fn filter_rows(rows: &[ReportRow], filters: &[ColumnFilter]) -> Vec<RowId> {
    let active: Vec<(Column, &str)> = filters
        .iter()
        .map(|f| (f.column, f.value.trim()))
        .filter(|(_, v)| !v.is_empty())
        .collect();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| active.iter().all(|(column, value)| column.matches(row, value)))
        .map(|(id, _)| id)
        .collect()
}

/// `ids` を `sorting` で安定ソート（後のキーは同順位の決定に使う）
pub fn sort_rows(rows: &[ReportRow], ids: &mut [RowId], sorting: &[SortKey]) {
    if sorting.is_empty() {
        return;
    }
    ids.sort_by(|&a, &b| {
        sorting
            .iter()
            .map(|key| {
                let ord = key.column.compare(&rows[a], &rows[b]);
                match key.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// フィルタしてからソート
pub fn derive_rows(rows: &[ReportRow], state: &TableViewState) -> Vec<RowId> {
    let mut ids = filter_rows(rows, &state.filters);
    sort_rows(rows, &mut ids, &state.sorting);
    ids
}

/// 取得した行と表示状態
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
    state: TableViewState,
}

impl ReportTable {
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self {
            rows,
            state: TableViewState::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.state.pagination.page_size = page_size.max(1);
        self
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&ReportRow> {
        self.rows.get(id)
    }

    pub fn state(&self) -> &TableViewState {
        &self.state
    }

    /// データを丸ごと置き換え
    ///
    /// 行IDは位置なので選択は解除する。ソート・フィルタ・
    /// 表示列は引き継ぐ。
    pub fn set_rows(&mut self, rows: Vec<ReportRow>) {
        self.rows = rows;
        self.state.selection.clear();
        self.state.pagination.page_index = 0;
    }

    // ── ソート ──────────────────────────────────────────────────────────────────

    pub fn set_sort(&mut self, sorting: Vec<SortKey>) {
        self.state.sorting = sorting;
    }

    /// ヘッダクリック: 昇順なら降順、それ以外は昇順
    pub fn toggle_sort(&mut self, column: Column) {
        let direction = match self.state.sort_direction(column) {
            Some(SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.state.sorting = vec![SortKey { column, direction }];
    }

    pub fn clear_sort(&mut self) {
        self.state.sorting.clear();
    }

    // ── フィルタ ──────────────────────────────────────────────────────────────────

    /// `column` のフィルタを置き換え（空なら解除）
    pub fn set_column_filter(&mut self, column: Column, value: &str) {
        self.state.filters.retain(|f| f.column != column);
        if !value.trim().is_empty() {
            self.state.filters.push(ColumnFilter {
                column,
                value: value.to_string(),
            });
        }
        self.state.pagination.page_index = 0;
    }

    pub fn column_filter(&self, column: Column) -> Option<&str> {
        self.state
            .filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    // ── 表示列 ──────────────────────────────────────────────────────────────────

    pub fn set_column_visibility(&mut self, column: Column, visible: bool) {
        self.state.visibility.insert(column, visible);
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .iter()
            .copied()
            .filter(|c| self.state.is_visible(*c))
            .collect()
    }

    // ── 選択 ──────────────────────────────────────────────────────────────────

    /// 選択を置き換え（範囲外のIDは無視）
    pub fn set_row_selection(&mut self, ids: impl IntoIterator<Item = RowId>) {
        let len = self.rows.len();
        self.state.selection = ids.into_iter().filter(|id| *id < len).collect();
    }

    pub fn toggle_row_selected(&mut self, id: RowId) {
        if id >= self.rows.len() {
            return;
        }
        if !self.state.selection.remove(&id) {
            self.state.selection.insert(id);
        }
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.state.selection.contains(&id)
    }

    pub fn selected_rows(&self) -> Vec<(RowId, &ReportRow)> {
        self.state
            .selection
            .iter()
            .filter_map(|&id| self.rows.get(id).map(|row| (id, row)))
            .collect()
    }

    /// コピー操作の対象
    pub fn public_oid(&self, id: RowId) -> Option<&str> {
        self.rows.get(id).map(|row| row.public_oid.as_str())
    }

    // ── 導出 ──────────────────────────────────────────────────────────────────

    /// フィルタを通った全行（ソート済み）
    pub fn derived_ids(&self) -> Vec<RowId> {
        derive_rows(&self.rows, &self.state)
    }

    pub fn filtered_count(&self) -> usize {
        filter_rows(&self.rows, &self.state.filters).len()
    }

    /// 現在のフィルタを通る選択行
    pub fn selected_filtered_count(&self) -> usize {
        filter_rows(&self.rows, &self.state.filters)
            .into_iter()
            .filter(|id| self.state.selection.contains(id))
            .count()
    }

    /// 現在のページ
    pub fn page(&self) -> Vec<(RowId, &ReportRow)> {
        let Pagination {
            page_index,
            page_size,
        } = self.state.pagination;
        self.derived_ids()
            .into_iter()
            .skip(page_index * page_size)
            .take(page_size)
            .map(|id| (id, &self.rows[id]))
            .collect()
    }

    // ── ページング ──────────────────────────────────────────────────────────────────

    pub fn page_index(&self) -> usize {
        self.state.pagination.page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.pagination.page_size
    }

    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.state.pagination.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.pagination.page_index + 1 < self.page_count()
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.state.pagination.page_index += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.state.pagination.page_index -= 1;
        }
    }

    /// ページ移動（最終ページで頭打ち）
    pub fn set_page_index(&mut self, index: usize) {
        let last = self.page_count().saturating_sub(1);
        self.state.pagination.page_index = index.min(last);
    }

    /// ページサイズ変更（現在の先頭行が表示され続ける）
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let first_row = self.state.pagination.page_index * self.state.pagination.page_size;
        self.state.pagination = Pagination {
            page_index: first_row / page_size,
            page_size,
        };
    }
}
