//! 캐시된 일봉의 정제와 시각화용 변환.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use ashare_core::{parse_trade_date, Candle, DailyBar, TsCode};

use crate::error::Result;
use crate::storage::{DailyStore, StockBasicStore};

/// 기본 차트 구간 (일).
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// 날짜가 파싱된 일봉.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub pre_close: Option<Decimal>,
    pub change: Option<Decimal>,
    pub pct_chg: Option<Decimal>,
    pub vol: Option<Decimal>,
    pub amount: Option<Decimal>,
}

impl ProcessedBar {
    /// 차트용 캔들로 변환합니다 (`vol` → `volume`, 없으면 0).
    pub fn to_candle(&self) -> Candle {
        Candle {
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.vol.unwrap_or(Decimal::ZERO),
        }
    }
}

/// 종목의 캐시된 일봉을 읽습니다. 파일이 없으면 `None`.
pub fn load_stock_data(store: &DailyStore, ts_code: &TsCode) -> Result<Option<Vec<DailyBar>>> {
    let bars = store.load(ts_code)?;
    if bars.is_none() {
        warn!(ts_code = %ts_code, path = %store.path(ts_code).display(), "Daily data file not found");
    }
    Ok(bars)
}

/// 일봉을 정제합니다.
///
/// 거래일을 파싱하고(실패한 행은 제외), 날짜 오름차순으로 정렬한 뒤
/// 비어 있는 선택 필드를 직전 행 값으로 채웁니다.
pub fn process_stock_data(bars: Vec<DailyBar>) -> Vec<ProcessedBar> {
    let mut processed: Vec<ProcessedBar> = bars
        .into_iter()
        .filter_map(|bar| match parse_trade_date(&bar.trade_date) {
            Ok(date) => Some(ProcessedBar {
                date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                pre_close: bar.pre_close,
                change: bar.change,
                pct_chg: bar.pct_chg,
                vol: bar.vol,
                amount: bar.amount,
            }),
            Err(e) => {
                warn!(ts_code = %bar.ts_code, trade_date = %bar.trade_date, error = %e, "Dropping row");
                None
            }
        })
        .collect();

    processed.sort_by_key(|bar| bar.date);

    for i in 1..processed.len() {
        let (before, after) = processed.split_at_mut(i);
        let prev = &before[i - 1];
        let current = &mut after[0];
        fill(&mut current.pre_close, prev.pre_close);
        fill(&mut current.change, prev.change);
        fill(&mut current.pct_chg, prev.pct_chg);
        fill(&mut current.vol, prev.vol);
        fill(&mut current.amount, prev.amount);
    }

    processed
}

fn fill(slot: &mut Option<Decimal>, previous: Option<Decimal>) {
    if slot.is_none() {
        *slot = previous;
    }
}

/// 시각화용 캔들을 준비합니다.
///
/// `start <= 날짜 <= end` 범위로 자르며 각 경계는 생략할 수 있습니다.
/// 데이터 파일이 없으면 `None`.
pub fn prepare_for_visualization(
    store: &DailyStore,
    ts_code: &TsCode,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<Vec<Candle>>> {
    let Some(bars) = load_stock_data(store, ts_code)? else {
        return Ok(None);
    };

    let candles: Vec<Candle> = process_stock_data(bars)
        .iter()
        .filter(|bar| start.map_or(true, |s| bar.date >= s))
        .filter(|bar| end.map_or(true, |e| bar.date <= e))
        .map(ProcessedBar::to_candle)
        .collect();

    debug!(ts_code = %ts_code, count = candles.len(), "Prepared candles");
    Ok(Some(candles))
}

/// 종목명을 조회합니다.
///
/// 목록 파일이 없거나, 종목이 없거나, 읽기에 실패하면 코드 문자열을 그대로 반환합니다.
pub fn get_stock_name(store: &StockBasicStore, ts_code: &TsCode) -> String {
    if !store.exists() {
        warn!("Stock list file not found");
        return ts_code.to_string();
    }

    match store.find(ts_code.as_str()) {
        Ok(Some(stock)) if !stock.name.is_empty() => stock.name,
        Ok(_) => ts_code.to_string(),
        Err(e) => {
            error!(ts_code = %ts_code, error = %e, "Failed to read stock name");
            ts_code.to_string()
        }
    }
}

/// 기본 차트 구간 (`today - 365일`, `today`).
pub fn default_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(DEFAULT_WINDOW_DAYS), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashare_core::StockBasic;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(date: &str, close: Decimal, vol: Option<Decimal>) -> DailyBar {
        DailyBar {
            ts_code: "000001.SZ".to_string(),
            trade_date: date.to_string(),
            open: close - dec!(0.1),
            high: close + dec!(0.2),
            low: close - dec!(0.2),
            close,
            pre_close: None,
            change: None,
            pct_chg: None,
            vol,
            amount: None,
        }
    }

    fn code() -> TsCode {
        TsCode::parse("000001.SZ").unwrap()
    }

    #[test]
    fn test_process_sorts_drops_and_fills() {
        let bars = vec![
            bar("20240104", dec!(10.3), None),
            bar("bad-date", dec!(1), Some(dec!(1))),
            bar("20240102", dec!(10.1), Some(dec!(500))),
            bar("20240103", dec!(10.2), None),
        ];

        let processed = process_stock_data(bars);

        assert_eq!(processed.len(), 3);
        assert_eq!(processed[0].date, day(2024, 1, 2));
        assert_eq!(processed[2].date, day(2024, 1, 4));
        // 직전 값으로 채움
        assert_eq!(processed[1].vol, Some(dec!(500)));
        assert_eq!(processed[2].vol, Some(dec!(500)));
        // 첫 행 이전 값은 없음
        assert_eq!(processed[0].pre_close, None);
    }

    #[test]
    fn test_prepare_filters_inclusive_range() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        store
            .save(
                &code(),
                &[
                    bar("20240102", dec!(10.1), Some(dec!(500))),
                    bar("20240103", dec!(10.2), Some(dec!(600))),
                    bar("20240104", dec!(10.3), Some(dec!(700))),
                ],
            )
            .unwrap();

        let candles = prepare_for_visualization(&store, &code(), Some(day(2024, 1, 3)), Some(day(2024, 1, 4)))
            .unwrap()
            .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date, day(2024, 1, 3));
        assert_eq!(candles[0].volume, dec!(600));

        let all = prepare_for_visualization(&store, &code(), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(all.len(), 3);

        let empty = prepare_for_visualization(&store, &code(), Some(day(2025, 1, 1)), None)
            .unwrap()
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_prepare_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        assert!(prepare_for_visualization(&store, &code(), None, None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_get_stock_name_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let store = StockBasicStore::new(dir.path().join("stock_basic.csv"));

        assert_eq!(get_stock_name(&store, &code()), "000001.SZ");

        store
            .save(&[StockBasic {
                ts_code: "000001.SZ".to_string(),
                symbol: "000001".to_string(),
                name: "平安银行".to_string(),
                area: String::new(),
                industry: String::new(),
                market: "主板".to_string(),
                list_date: "19910403".to_string(),
                is_hs: "S".to_string(),
                delist_date: None,
            }])
            .unwrap();

        assert_eq!(get_stock_name(&store, &code()), "平安银行");
        let other = TsCode::parse("600519.SH").unwrap();
        assert_eq!(get_stock_name(&store, &other), "600519.SH");
    }

    #[test]
    fn test_default_window() {
        let (start, end) = default_window(day(2024, 6, 30));
        assert_eq!(end, day(2024, 6, 30));
        assert_eq!(start, day(2023, 7, 1));
    }
}
