//! Tushare Pro 데이터 소스.
//!
//! Tushare Pro HTTP API에서 종목 목록과 일봉을 조회합니다.
//! 모든 요청은 하나의 엔드포인트로 보내는 JSON POST이며, 응답은
//! `fields`(컬럼 이름)와 `items`(행 배열)로 이루어진 표 형식입니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use ashare_data::provider::TushareClient;
//!
//! let client = TushareClient::new(&config.tushare)?;
//! let bars = client.daily(&ts_code, start, end).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use ashare_core::{
    format_trade_date, DailyBar, StockBasic, TsCode, TushareConfig, DAILY_COLUMNS,
    STOCK_BASIC_FIELDS,
};

use super::MarketDataProvider;
use crate::error::{DataError, Result};

/// 종목 목록 API 이름.
const API_STOCK_BASIC: &str = "stock_basic";

/// 일봉 API 이름.
const API_DAILY: &str = "daily";

/// Tushare 요청 본문.
#[derive(Debug, Serialize)]
struct TushareRequest<'a> {
    api_name: &'a str,
    token: &'a str,
    params: Value,
    fields: &'a str,
}

/// Tushare 응답 본문.
#[derive(Debug, Deserialize)]
struct TushareResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<TushareTable>,
}

/// 표 형식 응답 데이터.
#[derive(Debug, Deserialize)]
struct TushareTable {
    fields: Vec<String>,
    #[serde(default)]
    items: Vec<Vec<Value>>,
}

/// Tushare Pro 클라이언트.
pub struct TushareClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TushareClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &TushareConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(DataError::ConfigError(
                "Tushare token is empty (set TUSHARE_TOKEN or tushare.token)".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// API를 호출하고 표 형식 응답을 레코드로 변환합니다.
    async fn query<T: DeserializeOwned>(
        &self,
        api_name: &str,
        params: Value,
        fields: &str,
    ) -> Result<Vec<T>> {
        debug!(api_name = api_name, params = %params, "Tushare 요청");

        let request = TushareRequest {
            api_name,
            token: &self.token,
            params,
            fields,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DataError::FetchError(format!("Tushare API 호출 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(DataError::FetchError(format!(
                "Tushare API 오류: {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::FetchError(format!("응답 읽기 실패: {}", e)))?;

        debug!(api_name = api_name, response_len = text.len(), "Tushare 응답 수신");

        let body: TushareResponse = serde_json::from_str(&text).map_err(|e| {
            DataError::ParseError(format!(
                "JSON 파싱 실패: {} - {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })?;

        if body.code != 0 {
            return Err(DataError::ApiError {
                code: body.code,
                msg: body.msg.unwrap_or_default(),
            });
        }

        match body.data {
            Some(table) => records_from_table(table),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketDataProvider for TushareClient {
    async fn stock_basic(&self) -> Result<Vec<StockBasic>> {
        let params = json!({ "exchange": "", "list_status": "L" });
        let stocks: Vec<StockBasic> = self
            .query(API_STOCK_BASIC, params, STOCK_BASIC_FIELDS)
            .await?;

        info!(count = stocks.len(), "Tushare 종목 목록 조회 완료");
        Ok(stocks)
    }

    async fn daily(
        &self,
        ts_code: &TsCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let params = json!({
            "ts_code": ts_code.as_str(),
            "start_date": format_trade_date(start),
            "end_date": format_trade_date(end),
        });
        let fields = DAILY_COLUMNS.join(",");
        let bars: Vec<DailyBar> = self.query(API_DAILY, params, &fields).await?;

        info!(
            ts_code = %ts_code,
            start = %start,
            end = %end,
            count = bars.len(),
            "Tushare 일봉 조회 완료"
        );
        Ok(bars)
    }
}

/// `fields` × `items` 표를 레코드 목록으로 변환합니다.
///
/// 숫자는 문자열로 바꾸고 null 칸은 생략하여, 레코드 쪽의 기본값/Option 처리를 따릅니다.
fn records_from_table<T: DeserializeOwned>(table: TushareTable) -> Result<Vec<T>> {
    let TushareTable { fields, items } = table;
    let mut records = Vec::with_capacity(items.len());

    for (row_index, row) in items.into_iter().enumerate() {
        if row.len() != fields.len() {
            return Err(DataError::ParseError(format!(
                "행 {}의 컬럼 수({})가 필드 수({})와 다릅니다",
                row_index,
                row.len(),
                fields.len()
            )));
        }

        let mut object = Map::with_capacity(fields.len());
        for (field, value) in fields.iter().zip(row) {
            let normalized = match value {
                Value::Null => continue,
                Value::Number(n) => Value::String(n.to_string()),
                Value::Bool(b) => Value::String(b.to_string()),
                other => other,
            };
            object.insert(field.clone(), normalized);
        }

        let record = serde_json::from_value(Value::Object(object))
            .map_err(|e| DataError::ParseError(format!("행 {} 변환 실패: {}", row_index, e)))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn config_for(url: String) -> TushareConfig {
        TushareConfig {
            token: "test-token".to_string(),
            api_url: url,
            ..TushareConfig::default()
        }
    }

    fn code() -> TsCode {
        TsCode::parse("000001.SZ").unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_token_rejected() {
        let config = TushareConfig::default();
        assert!(matches!(
            TushareClient::new(&config),
            Err(DataError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_daily_parses_table() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "api_name": "daily",
                "token": "test-token",
                "params": {
                    "ts_code": "000001.SZ",
                    "start_date": "20240102",
                    "end_date": "20240103"
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 0,
                    "msg": "",
                    "data": {
                        "fields": DAILY_COLUMNS,
                        "items": [
                            ["000001.SZ", "20240103", 9.3, 9.45, 9.21, 9.38, 9.3, 0.08, 0.86, 1158366.45, 1075742.1],
                            ["000001.SZ", "20240102", 9.39, 9.42, 9.21, 9.21, 9.39, null, -1.92, 1158366.45, 1075742.1]
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = TushareClient::new(&config_for(server.url())).unwrap();
        let bars = client
            .daily(&code(), day(2024, 1, 2), day(2024, 1, 3))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].trade_date, "20240103");
        assert_eq!(bars[0].close, dec!(9.38));
        assert_eq!(bars[0].vol, Some(dec!(1158366.45)));
        assert_eq!(bars[1].change, None);
        assert_eq!(bars[1].pct_chg, Some(dec!(-1.92)));
    }

    #[tokio::test]
    async fn test_stock_basic_request_and_nulls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "api_name": "stock_basic",
                "params": { "exchange": "", "list_status": "L" }
            })))
            .with_status(200)
            .with_body(
                json!({
                    "code": 0,
                    "msg": "",
                    "data": {
                        "fields": ["ts_code", "symbol", "name", "area", "industry", "market", "list_date", "is_hs", "delist_date"],
                        "items": [
                            ["000001.SZ", "000001", "平安银行", "深圳", "银行", "主板", "19910403", "S", null],
                            ["430047.BJ", "430047", "诺思兰德", "北京", null, "北交所", "20201120", "N", null]
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = TushareClient::new(&config_for(server.url())).unwrap();
        let stocks = client.stock_basic().await.unwrap();

        mock.assert_async().await;
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].name, "平安银行");
        assert!(stocks[0].delist_date.is_none());
        assert_eq!(stocks[1].industry, "");
        assert!(stocks[1].is_beijing_exchange());
    }

    #[tokio::test]
    async fn test_api_error_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"code": 40101, "msg": "token invalid", "data": null}"#)
            .create_async()
            .await;

        let client = TushareClient::new(&config_for(server.url())).unwrap();
        let err = client
            .daily(&code(), day(2024, 1, 2), day(2024, 1, 3))
            .await
            .unwrap_err();

        match err {
            DataError::ApiError { code, msg } => {
                assert_eq!(code, 40101);
                assert_eq!(msg, "token invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_retryable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let client = TushareClient::new(&config_for(server.url())).unwrap();
        let err = client.stock_basic().await.unwrap_err();

        assert!(matches!(err, DataError::FetchError(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_items() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"code": 0, "msg": "", "data": {"fields": ["ts_code"], "items": []}}"#)
            .create_async()
            .await;

        let client = TushareClient::new(&config_for(server.url())).unwrap();
        let bars = client
            .daily(&code(), day(2024, 1, 6), day(2024, 1, 7))
            .await
            .unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_row_width_mismatch() {
        let table = TushareTable {
            fields: vec!["ts_code".to_string(), "name".to_string()],
            items: vec![vec![json!("000001.SZ")]],
        };
        let result: Result<Vec<StockBasic>> = records_from_table(table);
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }
}
