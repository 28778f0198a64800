//! レポート取得モジュール
//!
//! `POST /monitor` に `{"params": {...}}` を送り、レスポンスは `Data` のみ使う。
//! 通信・ステータス・デコードのエラーはログに出し、
//! `MonitorError::FetchFailed` として返す。

use super::ApiClient;
use crate::error::{MonitorError, Result};
use monitor_panel_common::{FilterParams, ReportResponse, ReportRow};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

pub const MONITOR_PATH: &str = "/monitor";

#[derive(Serialize)]
struct MonitorRequest {
    params: Map<String, Value>,
}

/// フィルタ条件からレポート行を取得できるもの
#[allow(async_fn_in_trait)]
pub trait ReportSource {
    async fn fetch(&self, params: &FilterParams) -> Result<Vec<ReportRow>>;
}

impl ReportSource for ApiClient {
    async fn fetch(&self, params: &FilterParams) -> Result<Vec<ReportRow>> {
        fetch_report_data(self, params).await
    }
}

pub async fn fetch_report_data(client: &ApiClient, params: &FilterParams) -> Result<Vec<ReportRow>> {
    let url = client.url(MONITOR_PATH);
    debug!(url = %url, filters = params.filters().len(), "fetching report data");

    match request_report(client, &url, params).await {
        Ok(response) => {
            debug!(rows = response.data.len(), total = response.total, "report data received");
            Ok(response.data)
        }
        Err(e) => {
            error!(url = %url, error = %e, "error fetching report data");
            Err(MonitorError::FetchFailed)
        }
    }
}

async fn request_report(
    client: &ApiClient,
    url: &str,
    params: &FilterParams,
) -> reqwest::Result<ReportResponse> {
    let body = MonitorRequest {
        params: params.to_wire(),
    };

    client
        .http()
        .post(url)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json::<ReportResponse>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let params = FilterParams::new().with_query("news");
        let body = MonitorRequest {
            params: params.to_wire(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"params": {"query": "news"}}));
    }

    #[test]
    fn test_request_body_empty_params() {
        let body = MonitorRequest {
            params: FilterParams::new().to_wire(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"params": {}}));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_fetch_failed() {
        // ポート9 (discard) ではHTTPサーバは動いていない前提
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let result = fetch_report_data(&client, &FilterParams::new()).await;
        assert!(matches!(result, Err(MonitorError::FetchFailed)));
    }
}
