//! 데이터 Provider 모듈.
//!
//! 원격 데이터 소스에서 종목 목록과 일봉을 가져오는 Provider를 정의합니다.
//!
//! ## Tushare Pro
//! - `TushareClient`: Tushare Pro HTTP API 클라이언트 (토큰 필요)
//! - 종목 기본 정보(`stock_basic`), 일봉(`daily`)

pub mod tushare;

use async_trait::async_trait;
use chrono::NaiveDate;

use ashare_core::{DailyBar, StockBasic, TsCode};

use crate::error::Result;

pub use tushare::TushareClient;

/// 시장 데이터 Provider.
///
/// 증분 수집기는 이 trait만 사용하므로, 테스트에서는 가짜 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 상장 종목 전체 목록을 조회합니다.
    async fn stock_basic(&self) -> Result<Vec<StockBasic>>;

    /// 기간 내 일봉을 조회합니다 (양 끝 포함).
    ///
    /// 기간 내 거래가 없으면 빈 벡터를 반환합니다.
    async fn daily(&self, ts_code: &TsCode, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<DailyBar>>;
}
