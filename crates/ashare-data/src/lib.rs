//! 일봉 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - Tushare Pro API 클라이언트
//! - 종목별 일봉 CSV 캐시와 종목 목록 저장소
//! - 증분 수집기 (캐시 이후 구간만 조회 후 병합)
//! - 캐시 데이터 정제 및 시각화용 변환

pub mod error;
pub mod fetcher;
pub mod processor;
pub mod provider;
pub mod retry;
pub mod storage;

pub use error::{DataError, Result};

// 수집기 재내보내기
pub use fetcher::{DailyFetcher, FetchOutcome, FetchReport, FetchSettings};

// 정제/변환 재내보내기
pub use processor::{
    default_window, get_stock_name, load_stock_data, prepare_for_visualization,
    process_stock_data, ProcessedBar,
};

// Provider 재내보내기
pub use provider::{MarketDataProvider, TushareClient};
pub use retry::{retry, RetryPolicy};

// 저장소 재내보내기
pub use storage::{merge_bars, DailyStore, StockBasicStore};
