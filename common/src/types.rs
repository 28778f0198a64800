//! レポート行の型定義
//!
//! 項目名はレポートAPIのまま（`StationName`,
//! `EPGCategory`, `Public_Oid` など）。欠落や `null` の項目は
//! デフォルト値になる。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `null` は型のデフォルト値として読む
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 出稿1件（放送されたスポット）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReportRow {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    /// 放送秒数
    #[serde(deserialize_with = "null_as_default")]
    pub duration: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub station_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub station_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_brand_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_advertiser_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub province_code: String,
    #[serde(rename = "EPG", deserialize_with = "null_as_default")]
    pub epg: String,
    #[serde(rename = "EPGCategory", deserialize_with = "null_as_default")]
    pub epg_category: String,
    #[serde(rename = "EPGSubCategory", deserialize_with = "null_as_default")]
    pub epg_sub_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub spot_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub station_network_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_category_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_sub_category_name: String,
    #[serde(rename = "BreakEPG", deserialize_with = "null_as_default")]
    pub break_epg: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub break_index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_spot_type: i64,
    /// 外部参照用の識別子
    #[serde(rename = "Public_Oid", deserialize_with = "null_as_default")]
    pub public_oid: String,
}

/// `/monitor` のレスポンス
///
/// 型を付けるのは `Data` と `Total` だけ。残りのメタデータは
/// レポート種別で形が変わるため生のJSONで持つ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportResponse {
    #[serde(rename = "Data", deserialize_with = "null_as_default")]
    pub data: Vec<ReportRow>,
    #[serde(rename = "Total", deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(rename = "channelType")]
    pub channel_type: Option<Value>,
    #[serde(rename = "stationAvailability")]
    pub station_availability: Option<Value>,
    #[serde(rename = "ExportMode")]
    pub export_mode: Option<Value>,
    #[serde(rename = "type")]
    pub report_type: Option<Value>,
    #[serde(rename = "BeginDate")]
    pub begin_date: Option<Value>,
    #[serde(rename = "EndDate")]
    pub end_date: Option<Value>,
    #[serde(rename = "FilteredBy")]
    pub filtered_by: Option<Value>,
    pub status: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_row_default() {
        let row = ReportRow::default();
        assert_eq!(row.title, "");
        assert_eq!(row.duration, 0.0);
    }

    #[test]
    fn test_report_row_deserialize_wire_names() {
        let json = r#"{
            "Date": "2024-01-02",
            "Time": "10:15:00",
            "Duration": 30,
            "Title": "Promo Verao",
            "StationName": "Radio Sul",
            "EPG": "Jornal",
            "EPGCategory": "News",
            "BreakEPG": 4,
            "PriceValue": "1.250,00",
            "Public_Oid": "oid-1"
        }"#;

        let row: ReportRow = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(row.date, "2024-01-02");
        assert_eq!(row.duration, 30.0);
        assert_eq!(row.station_name, "Radio Sul");
        assert_eq!(row.epg, "Jornal");
        assert_eq!(row.epg_category, "News");
        assert_eq!(row.break_epg, 4);
        assert_eq!(row.price_value, "1.250,00");
        assert_eq!(row.public_oid, "oid-1");
        // 欠落項目はデフォルト値
        assert_eq!(row.city_name, "");
        assert_eq!(row.sub_spot_type, 0);
    }

    #[test]
    fn test_report_row_serialize_wire_names() {
        let row = ReportRow {
            title: "A".to_string(),
            public_oid: "x".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&row).expect("serialize failed");
        assert!(json.contains("\"Title\":\"A\""));
        assert!(json.contains("\"Public_Oid\":\"x\""));
        assert!(json.contains("\"EPGSubCategory\""));
        assert!(json.contains("\"AdAdvertiserName\""));
    }

    #[test]
    fn test_report_response_envelope() {
        let json = r#"{"Data": [], "Total": 0, "type": 2, "FilteredBy": [], "status": 200}"#;
        let response: ReportResponse = serde_json::from_str(json).expect("deserialize failed");
        assert!(response.data.is_empty());
        assert_eq!(response.total, 0);
        assert_eq!(response.report_type, Some(Value::from(2)));
        assert_eq!(response.status, Some(Value::from(200)));
        assert!(response.begin_date.is_none());
    }

    #[test]
    fn test_report_response_missing_data() {
        let response: ReportResponse = serde_json::from_str("{}").expect("deserialize failed");
        assert!(response.data.is_empty());
    }

    /// メタデータの形が想定外でも行は読めること
    #[test]
    fn test_report_response_untyped_metadata() {
        let json = r#"{
            "Data": [{"Title": "Spot A"}],
            "Total": 1,
            "channelType": "tv",
            "status": "ok",
            "type": {"id": 3},
            "ExportMode": null,
            "FilteredBy": {"query": "news"}
        }"#;
        let response: ReportResponse = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].title, "Spot A");
        assert_eq!(response.total, 1);
        assert_eq!(response.channel_type, Some(Value::from("tv")));
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let json = r#"{"Data": [{"Duration": null, "Title": null, "BreakIndex": null, "Public_Oid": "oid-9"}], "Total": null}"#;
        let response: ReportResponse = serde_json::from_str(json).expect("deserialize failed");
        let row = &response.data[0];
        assert_eq!(row.duration, 0.0);
        assert_eq!(row.title, "");
        assert_eq!(row.break_index, 0);
        assert_eq!(row.public_oid, "oid-9");
        assert_eq!(response.total, 0);

        let response: ReportResponse = serde_json::from_str(r#"{"Data": null}"#).expect("deserialize failed");
        assert!(response.data.is_empty());
    }
}
