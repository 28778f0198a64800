//! レポート列定義
//!
//! `ReportRow` の各項目を `Column` で指す。列IDはAPIの項目名そのままで、
//! テーブル状態・CLI引数・サーバ側フィルタキーで
//! 同じ識別子を使う。

use crate::error::{Error, Result};
use crate::types::ReportRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// 列の比較・フィルタ方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// テキスト: 大文字小文字を無視した部分一致、自然順ソート
    Text,
    /// 数値: 完全一致フィルタ、数値ソート
    Number,
    /// 日付文字列: 部分一致フィルタ、日付ソート
    Date,
    /// 金額文字列: 部分一致フィルタ、数値ソート
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Date,
    Time,
    Duration,
    Title,
    StationName,
    StationType,
    AdBrandName,
    AdAdvertiserName,
    CityName,
    ProvinceCode,
    #[serde(rename = "EPG")]
    Epg,
    #[serde(rename = "EPGCategory")]
    EpgCategory,
    #[serde(rename = "EPGSubCategory")]
    EpgSubCategory,
    Tags,
    PriceValue,
    SpotType,
    StationNetworkName,
    AdCategoryName,
    AdSubCategoryName,
    #[serde(rename = "BreakEPG")]
    BreakEpg,
    BreakIndex,
    SubSpotType,
    #[serde(rename = "Public_Oid")]
    PublicOid,
}

impl Column {
    pub const ALL: [Column; 23] = [
        Column::Date,
        Column::Time,
        Column::Duration,
        Column::Title,
        Column::StationName,
        Column::StationType,
        Column::AdBrandName,
        Column::AdAdvertiserName,
        Column::CityName,
        Column::ProvinceCode,
        Column::Epg,
        Column::EpgCategory,
        Column::EpgSubCategory,
        Column::Tags,
        Column::PriceValue,
        Column::SpotType,
        Column::StationNetworkName,
        Column::AdCategoryName,
        Column::AdSubCategoryName,
        Column::BreakEpg,
        Column::BreakIndex,
        Column::SubSpotType,
        Column::PublicOid,
    ];

    /// APIの項目名
    pub fn id(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Time => "Time",
            Column::Duration => "Duration",
            Column::Title => "Title",
            Column::StationName => "StationName",
            Column::StationType => "StationType",
            Column::AdBrandName => "AdBrandName",
            Column::AdAdvertiserName => "AdAdvertiserName",
            Column::CityName => "CityName",
            Column::ProvinceCode => "ProvinceCode",
            Column::Epg => "EPG",
            Column::EpgCategory => "EPGCategory",
            Column::EpgSubCategory => "EPGSubCategory",
            Column::Tags => "Tags",
            Column::PriceValue => "PriceValue",
            Column::SpotType => "SpotType",
            Column::StationNetworkName => "StationNetworkName",
            Column::AdCategoryName => "AdCategoryName",
            Column::AdSubCategoryName => "AdSubCategoryName",
            Column::BreakEpg => "BreakEPG",
            Column::BreakIndex => "BreakIndex",
            Column::SubSpotType => "SubSpotType",
            Column::PublicOid => "Public_Oid",
        }
    }

    /// 表ヘッダのラベル
    pub fn header(&self) -> &'static str {
        match self {
            Column::StationName => "Station Name",
            Column::StationType => "Station Type",
            Column::AdBrandName => "Brand",
            Column::AdAdvertiserName => "Advertiser",
            Column::CityName => "City",
            Column::ProvinceCode => "Province",
            Column::EpgCategory => "EPG Category",
            Column::EpgSubCategory => "EPG Subcategory",
            Column::PriceValue => "Price",
            Column::SpotType => "Spot Type",
            Column::StationNetworkName => "Network",
            Column::AdCategoryName => "Ad Category",
            Column::AdSubCategoryName => "Ad Subcategory",
            Column::BreakEpg => "Break EPG",
            Column::BreakIndex => "Break Index",
            Column::SubSpotType => "Sub Spot Type",
            other => other.id(),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Duration
            | Column::StationType
            | Column::SpotType
            | Column::BreakEpg
            | Column::BreakIndex
            | Column::SubSpotType => ColumnKind::Number,
            Column::Date => ColumnKind::Date,
            Column::PriceValue => ColumnKind::Amount,
            _ => ColumnKind::Text,
        }
    }

    /// 初期表示の列
    pub fn visible_by_default(&self) -> bool {
        matches!(
            self,
            Column::Date | Column::Time | Column::Duration | Column::Title | Column::StationName
        )
    }

    /// `Number` 列の数値
    pub fn number(&self, row: &ReportRow) -> Option<f64> {
        match self {
            Column::Duration => Some(row.duration),
            Column::StationType => Some(row.station_type as f64),
            Column::SpotType => Some(row.spot_type as f64),
            Column::BreakEpg => Some(row.break_epg as f64),
            Column::BreakIndex => Some(row.break_index as f64),
            Column::SubSpotType => Some(row.sub_spot_type as f64),
            _ => None,
        }
    }

    /// 項目の生テキスト
    pub fn text<'a>(&self, row: &'a ReportRow) -> Cow<'a, str> {
        let s: &'a str = match self {
            Column::Date => &row.date,
            Column::Time => &row.time,
            Column::Title => &row.title,
            Column::StationName => &row.station_name,
            Column::AdBrandName => &row.ad_brand_name,
            Column::AdAdvertiserName => &row.ad_advertiser_name,
            Column::CityName => &row.city_name,
            Column::ProvinceCode => &row.province_code,
            Column::Epg => &row.epg,
            Column::EpgCategory => &row.epg_category,
            Column::EpgSubCategory => &row.epg_sub_category,
            Column::Tags => &row.tags,
            Column::PriceValue => &row.price_value,
            Column::StationNetworkName => &row.station_network_name,
            Column::AdCategoryName => &row.ad_category_name,
            Column::AdSubCategoryName => &row.ad_sub_category_name,
            Column::PublicOid => &row.public_oid,
            numeric => {
                return Cow::Owned(numeric.number(row).map(format_number).unwrap_or_default());
            }
        };
        Cow::Borrowed(s)
    }

    /// 列フィルタの判定
    ///
    /// `value` はトリム済みかつ空でない前提。
    pub fn matches(&self, row: &ReportRow, value: &str) -> bool {
        match self.kind() {
            ColumnKind::Number => match (value.parse::<f64>(), self.number(row)) {
                (Ok(wanted), Some(actual)) => actual == wanted,
                _ => false,
            },
            ColumnKind::Text | ColumnKind::Date | ColumnKind::Amount => self
                .text(row)
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }

    /// この列で2行を昇順比較
    pub fn compare(&self, a: &ReportRow, b: &ReportRow) -> Ordering {
        match self.kind() {
            ColumnKind::Number => {
                let av = self.number(a).unwrap_or(f64::INFINITY);
                let bv = self.number(b).unwrap_or(f64::INFINITY);
                av.total_cmp(&bv)
            }
            ColumnKind::Date => {
                let (at, bt) = (self.text(a), self.text(b));
                compare_parsed(parse_date(&at), parse_date(&bt))
                    .unwrap_or_else(|| natural_cmp(&at, &bt))
            }
            ColumnKind::Amount => {
                let (at, bt) = (self.text(a), self.text(b));
                compare_parsed(parse_amount(&at), parse_amount(&bt))
                    .unwrap_or_else(|| natural_cmp(&at, &bt))
            }
            ColumnKind::Text => natural_cmp(&self.text(a), &self.text(b)),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownColumn(wanted.to_string()))
    }
}

/// 両方パースできれば比較、片方だけならそちらが先。
/// どちらも不可なら `None`（呼び出し側でテキスト比較）。
fn compare_parsed<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (None, None) => None,
    }
}

/// `YYYY-MM-DD`（後ろに時刻 `T...` / ` ...` が続いてもよい）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// 金額文字列を数値に変換
///
/// `1234.5`, `1,234.50`, `1.234,50` と `R$` 接頭辞に対応。
/// 有限でない値は `None`。
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00A0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 小数点がカンマ: 1.234,50
        (Some(comma), dot) if dot.map_or(true, |d| d < comma) => {
            cleaned.replace('.', "").replace(',', ".")
        }
        // 小数点がピリオド: 1,234.50
        _ => cleaned.replace(',', ""),
    };
    // "NaN" や "inf" は f64 としてはパースできるが金額ではない
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 大文字小文字を無視した自然順（`ad2` < `ad10`）
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) if ac.is_ascii_digit() && bc.is_ascii_digit() => {
                let an = take_digits(&mut ai);
                let bn = take_digits(&mut bi);
                let ord = an
                    .trim_start_matches('0')
                    .len()
                    .cmp(&bn.trim_start_matches('0').len())
                    .then_with(|| an.trim_start_matches('0').cmp(bn.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ac), Some(bc)) => {
                if ac != bc {
                    return ac.cmp(&bc);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(iter: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = iter.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        iter.next();
    }
    digits
}

/// 整数は末尾の `.0` なしで表示
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
