//! レポートのフィルタ条件
//!
//! レポートAPIは `params` に任意のキー/値を受け付ける。
//! こちらでは対応するフィルタを種類ごとに型で持ち、
//! リクエストボディを作るときだけキー/値形式に変換する。

use crate::column::Column;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// フリーテキスト検索の送信キー
pub const QUERY_KEY: &str = "query";

/// サーバ側フィルタ1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterParam {
    /// フリーテキスト検索（`query` として送信）
    FreeText { query: String },
    /// 項目が `value` と一致
    FieldEquals { column: Column, value: String },
    /// 項目が `from..=to` の範囲内（片側省略可）
    Range {
        column: Column,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
}

impl FilterParam {
    /// 送信時のキー
    pub fn wire_key(&self) -> &str {
        match self {
            FilterParam::FreeText { .. } => QUERY_KEY,
            FilterParam::FieldEquals { column, .. } | FilterParam::Range { column, .. } => {
                column.id()
            }
        }
    }

    fn wire_value(&self) -> Value {
        match self {
            FilterParam::FreeText { query } => Value::String(query.clone()),
            FilterParam::FieldEquals { value, .. } => Value::String(value.clone()),
            FilterParam::Range { from, to, .. } => {
                let mut bounds = Map::new();
                if let Some(from) = from {
                    bounds.insert("from".into(), Value::String(from.clone()));
                }
                if let Some(to) = to {
                    bounds.insert("to".into(), Value::String(to.clone()));
                }
                Value::Object(bounds)
            }
        }
    }
}

/// フィルタの順序付き集合（送信キーごとに最大1件）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterParams {
    filters: Vec<FilterParam>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &[FilterParam] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// 現在のフリーテキスト検索
    pub fn query(&self) -> Option<&str> {
        self.filters.iter().find_map(|f| match f {
            FilterParam::FreeText { query } => Some(query.as_str()),
            _ => None,
        })
    }

    /// フィルタを設定（同じ送信キーのものはその位置で置き換え）
    pub fn set(&mut self, filter: FilterParam) {
        let key = filter.wire_key().to_string();
        match self.filters.iter_mut().find(|f| f.wire_key() == key) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// `key` で送るフィルタを削除
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.wire_key() != key);
        before != self.filters.len()
    }

    /// フリーテキスト検索を設定（空なら解除）
    pub fn set_query(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.remove(QUERY_KEY);
        } else {
            self.set(FilterParam::FreeText {
                query: query.to_string(),
            });
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_equals(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(FilterParam::FieldEquals {
            column,
            value: value.into(),
        });
        self
    }

    pub fn with_range(mut self, column: Column, from: Option<String>, to: Option<String>) -> Self {
        self.set(FilterParam::Range { column, from, to });
        self
    }

    /// `params` として送るキー/値オブジェクト
    pub fn to_wire(&self) -> Map<String, Value> {
        self.filters
            .iter()
            .map(|f| (f.wire_key().to_string(), f.wire_value()))
            .collect()
    }
}

/// `COLUMN=VALUE` をパース
pub fn parse_assignment(input: &str) -> Result<(Column, String)> {
    let (column, value) = input
        .split_once('=')
        .ok_or_else(|| Error::InvalidFilter(format!("expected COLUMN=VALUE, got `{}`", input)))?;
    Ok((column.parse()?, value.to_string()))
}

/// `COLUMN=FROM..TO` をパース（`..` の片側は空でもよい）
pub fn parse_range(input: &str) -> Result<FilterParam> {
    let (column, value) = parse_assignment(input)?;
    let (from, to) = value.split_once("..").ok_or_else(|| {
        Error::InvalidFilter(format!("expected COLUMN=FROM..TO, got `{}`", input))
    })?;
    let bound = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    let (from, to) = (bound(from), bound(to));
    if from.is_none() && to.is_none() {
        return Err(Error::InvalidFilter(format!("range `{}` has no bounds", input)));
    }
    Ok(FilterParam::Range { column, from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_params_wire() {
        let params = FilterParams::new();
        assert!(params.is_empty());
        assert_eq!(Value::Object(params.to_wire()), json!({}));
    }

    #[test]
    fn test_query_wire() {
        let params = FilterParams::new().with_query("news");
        assert_eq!(params.query(), Some("news"));
        assert_eq!(Value::Object(params.to_wire()), json!({"query": "news"}));
    }

    #[test]
    fn test_query_replaced_and_cleared() {
        let mut params = FilterParams::new().with_query("news");
        params.set_query("sports");
        assert_eq!(params.filters().len(), 1);
        assert_eq!(params.query(), Some("sports"));

        params.set_query("  ");
        assert!(params.query().is_none());
        assert!(params.is_empty());
    }

    #[test]
    fn test_mixed_filters_wire() {
        let params = FilterParams::new()
            .with_query("promo")
            .with_equals(Column::CityName, "Curitiba")
            .with_range(Column::Date, Some("2024-01-01".into()), None);

        assert_eq!(
            Value::Object(params.to_wire()),
            json!({
                "query": "promo",
                "CityName": "Curitiba",
                "Date": {"from": "2024-01-01"}
            })
        );
    }

    #[test]
    fn test_same_key_replaces_in_place() {
        let params = FilterParams::new()
            .with_equals(Column::CityName, "Curitiba")
            .with_query("promo")
            .with_equals(Column::CityName, "Londrina");

        assert_eq!(params.filters().len(), 2);
        assert_eq!(params.filters()[0].wire_key(), "CityName");
        assert_eq!(params.to_wire()["CityName"], json!("Londrina"));
    }

    #[test]
    fn test_params_storage_form() {
        let params = FilterParams::new()
            .with_query("news")
            .with_equals(Column::Epg, "Jornal");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            json!([
                {"kind": "free_text", "query": "news"},
                {"kind": "field_equals", "column": "EPG", "value": "Jornal"}
            ])
        );
        let back: FilterParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_parse_assignment() {
        let (column, value) = parse_assignment("stationname=Radio Sul").unwrap();
        assert_eq!(column, Column::StationName);
        assert_eq!(value, "Radio Sul");

        assert!(matches!(parse_assignment("Title"), Err(Error::InvalidFilter(_))));
        assert!(matches!(parse_assignment("Nope=1"), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_parse_range() {
        let range = parse_range("Date=2024-01-01..2024-01-31").unwrap();
        assert_eq!(
            range,
            FilterParam::Range {
                column: Column::Date,
                from: Some("2024-01-01".into()),
                to: Some("2024-01-31".into()),
            }
        );

        let open = parse_range("Duration=..30").unwrap();
        assert!(matches!(open, FilterParam::Range { from: None, to: Some(_), .. }));

        assert!(parse_range("Date=2024").is_err());
        assert!(parse_range("Date=..").is_err());
    }
}
