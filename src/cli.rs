use clap::{Args, Parser, Subcommand};
use monitor_panel_common::filter::{parse_assignment, parse_range};
use monitor_panel_common::{
    Column, ColumnFilter, FilterParam, FilterParams, ReportTable, RowId, SortDirection, SortKey,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "monitor-panel")]
#[command(about = "Broadcast insertion monitor and media uploader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 出稿データを取得して表形式で表示
    Report(ReportArgs),

    /// メディアファイルを順番にアップロード
    Upload {
        /// ファイルまたはフォルダ（フォルダ直下のファイルが対象）
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// レポートAPIのベースURL
        #[arg(long)]
        set_base_url: Option<String>,

        #[arg(long)]
        show: bool,
    },

    /// 保存済みレポート条件の表示/削除
    Params {
        #[arg(long)]
        show: bool,

        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// サーバに送るフリーテキスト検索
    #[arg(short, long)]
    pub query: Option<String>,

    /// サーバ側の項目フィルタ
    #[arg(long = "where", value_name = "COL=VALUE", value_parser = parse_field_equals)]
    pub equals: Vec<FilterParam>,

    /// サーバ側の範囲フィルタ（片側は省略可）
    #[arg(long, value_name = "COL=FROM..TO", value_parser = parse_between)]
    pub between: Vec<FilterParam>,

    /// 取得した行に適用する列フィルタ
    #[arg(long, value_name = "COL=VALUE", value_parser = parse_column_filter)]
    pub filter: Vec<ColumnFilter>,

    /// ソートキー（優先順）
    #[arg(long, value_name = "COL[:asc|:desc]", value_parser = parse_sort_key)]
    pub sort: Vec<SortKey>,

    /// 列を表示
    #[arg(long, value_name = "COL")]
    pub show: Vec<Column>,

    /// 列を非表示
    #[arg(long, value_name = "COL")]
    pub hide: Vec<Column>,

    /// ページ番号（1始まり）
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: Option<u64>,

    /// 1ページの行数（デフォルトは設定値）
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// 選択する行ID（カンマ区切り）
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<RowId>,

    /// サーバ側の条件を `--use-saved` 用に保存
    #[arg(long)]
    pub save: bool,

    /// 保存済みの条件から開始
    #[arg(long)]
    pub use_saved: bool,

    /// 現在のページをJSONで出力
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    /// `base` の上にサーバ側条件を重ねる
    pub fn filter_params(&self, base: FilterParams) -> FilterParams {
        let mut params = base;
        if let Some(query) = &self.query {
            params.set_query(query);
        }
        for filter in self.equals.iter().chain(&self.between) {
            params.set(filter.clone());
        }
        params
    }

    /// 表示列・フィルタ・ソート・ページ・選択を適用
    pub fn apply_view(&self, table: &mut ReportTable) {
        for column in &self.show {
            table.set_column_visibility(*column, true);
        }
        for column in &self.hide {
            table.set_column_visibility(*column, false);
        }
        for filter in &self.filter {
            table.set_column_filter(filter.column, &filter.value);
        }
        if !self.sort.is_empty() {
            table.set_sort(self.sort.clone());
        }
        if let Some(size) = self.page_size {
            table.set_page_size(size as usize);
        }
        if let Some(page) = self.page {
            table.set_page_index(page as usize - 1);
        }
        if !self.select.is_empty() {
            table.set_row_selection(self.select.iter().copied());
        }
    }
}

fn parse_field_equals(s: &str) -> Result<FilterParam, String> {
    let (column, value) = parse_assignment(s).map_err(|e| e.to_string())?;
    Ok(FilterParam::FieldEquals { column, value })
}

fn parse_between(s: &str) -> Result<FilterParam, String> {
    parse_range(s).map_err(|e| e.to_string())
}

fn parse_column_filter(s: &str) -> Result<ColumnFilter, String> {
    let (column, value) = parse_assignment(s).map_err(|e| e.to_string())?;
    Ok(ColumnFilter { column, value })
}

/// `COL` または `COL:asc` / `COL:desc`
fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    let (column, direction) = match s.rsplit_once(':') {
        Some((column, direction)) => (column, direction.parse::<SortDirection>()?),
        None => (s, SortDirection::Asc),
    };
    let column: Column = column.parse().map_err(|e: monitor_panel_common::Error| e.to_string())?;
    Ok(SortKey { column, direction })
}
