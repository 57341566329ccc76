//! 종목 기본 정보.

use serde::{Deserialize, Serialize};

/// 베이징 증권거래소의 `market` 값.
pub const BEIJING_MARKET: &str = "北交所";

/// 종목 기본 정보 CSV 헤더 순서.
pub const STOCK_BASIC_FIELDS: &str =
    "ts_code,symbol,name,area,industry,market,list_date,is_hs,delist_date";

/// 상장 종목 기본 정보 (`stock_basic`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBasic {
    /// 종목 코드 (예: 000001.SZ)
    pub ts_code: String,
    /// 6자리 종목 번호
    #[serde(default)]
    pub symbol: String,
    /// 종목명
    #[serde(default)]
    pub name: String,
    /// 지역
    #[serde(default)]
    pub area: String,
    /// 업종
    #[serde(default)]
    pub industry: String,
    /// 시장 구분 (主板, 创业板, 科创板, 北交所 ...)
    #[serde(default)]
    pub market: String,
    /// 상장일 (YYYYMMDD)
    #[serde(default)]
    pub list_date: String,
    /// 후강퉁/선강퉁 구분 (N/H/S)
    #[serde(default)]
    pub is_hs: String,
    /// 상장폐지일
    #[serde(default)]
    pub delist_date: Option<String>,
}

impl StockBasic {
    /// 베이징 증권거래소 종목인지 확인합니다.
    pub fn is_beijing_exchange(&self) -> bool {
        self.market == BEIJING_MARKET
    }

    /// 상장 유지 중인지 확인합니다.
    pub fn is_listed(&self) -> bool {
        self.delist_date
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
    }
}
