//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `DailyBar` - 데이터 제공자가 반환하는 일봉 한 행 (CSV 캐시 형식과 동일)
//! - `Candle` - 차트/지표 계산용 OHLCV 캔들

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::parse_trade_date;

/// 일봉 CSV 헤더 순서.
pub const DAILY_COLUMNS: &[&str] = &[
    "ts_code",
    "trade_date",
    "open",
    "high",
    "low",
    "close",
    "pre_close",
    "change",
    "pct_chg",
    "vol",
    "amount",
];

/// 일봉 데이터 한 행.
///
/// 필드 이름은 제공자의 컬럼 이름과 같으며, 그대로 CSV 헤더가 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// 종목 코드
    pub ts_code: String,
    /// 거래일 (YYYYMMDD)
    pub trade_date: String,
    /// 시가
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    /// 고가
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    /// 저가
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    /// 종가
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    /// 전일 종가
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub pre_close: Option<Decimal>,
    /// 전일 대비 등락
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub change: Option<Decimal>,
    /// 등락률 (%)
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub pct_chg: Option<Decimal>,
    /// 거래량 (手, 100주 단위)
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub vol: Option<Decimal>,
    /// 거래대금 (천 위안)
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
}

impl DailyBar {
    /// 거래일을 날짜로 파싱합니다.
    pub fn date(&self) -> Result<NaiveDate, CoreError> {
        parse_trade_date(&self.trade_date)
    }

    /// 양봉(종가 >= 시가)인지 확인합니다.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// 차트용 OHLCV 캔들.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl Candle {
    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 >= 시가)인지 확인합니다.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}
