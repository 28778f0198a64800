//! レポート表のテキスト描画

use monitor_panel_common::column::parse_date;
use monitor_panel_common::{Column, ReportRow, ReportTable};

const MAX_CELL_WIDTH: usize = 40;

/// セルの表示文字列
pub fn format_cell(column: Column, row: &ReportRow) -> String {
    let raw = column.text(row);
    match column {
        Column::Date => parse_date(&raw)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| raw.into_owned()),
        Column::Duration => format!("{}s", raw),
        Column::Title => raw.to_lowercase(),
        _ => raw.into_owned(),
    }
}

/// 現在のページを桁揃えしたテキスト表にする
///
/// 先頭列は行ID（選択行には `*` を付ける）。
pub fn render_table(table: &ReportTable) -> String {
    let page = table.page();
    if page.is_empty() {
        return "No results.".to_string();
    }

    let columns = table.visible_columns();
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(page.len() + 1);

    let mut header = vec!["#".to_string()];
    header.extend(columns.iter().map(|c| sort_marker(table, *c)));
    grid.push(header);

    for (id, row) in &page {
        let marker = if table.is_selected(*id) { "*" } else { " " };
        let mut line = vec![format!("{}{}", marker, id)];
        line.extend(columns.iter().map(|c| truncate(&format_cell(*c, row))));
        grid.push(line);
    }

    let widths: Vec<usize> = (0..=columns.len())
        .map(|i| grid.iter().map(|line| line[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (n, line) in grid.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
        if n == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out.pop();
    out
}

/// `"x of y row(s) selected."`（フィルタ後の行で数える）
pub fn selection_label(table: &ReportTable) -> String {
    format!(
        "{} of {} row(s) selected.",
        table.selected_filtered_count(),
        table.filtered_count()
    )
}

pub fn page_label(table: &ReportTable) -> String {
    format!(
        "Page {} of {}",
        table.page_index() + 1,
        table.page_count().max(1)
    )
}

fn sort_marker(table: &ReportTable, column: Column) -> String {
    use monitor_panel_common::SortDirection;
    match table.state().sort_direction(column) {
        Some(SortDirection::Asc) => format!("{} ↑", column.header()),
        Some(SortDirection::Desc) => format!("{} ↓", column.header()),
        None => column.header().to_string(),
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut out: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}
