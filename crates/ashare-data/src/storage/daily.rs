//! 종목별 일봉 CSV 저장소.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, error};

use ashare_core::{parse_trade_date, DailyBar, TsCode, DAILY_COLUMNS};

use super::{read_csv, write_csv_atomic};
use crate::error::Result;

/// 일봉 CSV 저장소 (`<dir>/<ts_code>.csv`).
#[derive(Debug, Clone)]
pub struct DailyStore {
    dir: PathBuf,
}

impl DailyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 종목의 CSV 경로.
    pub fn path(&self, ts_code: &TsCode) -> PathBuf {
        self.dir.join(format!("{}.csv", ts_code))
    }

    pub fn exists(&self, ts_code: &TsCode) -> bool {
        self.path(ts_code).exists()
    }

    /// 캐시된 일봉을 읽습니다. 파일이 없으면 `None`.
    pub fn load(&self, ts_code: &TsCode) -> Result<Option<Vec<DailyBar>>> {
        let path = self.path(ts_code);
        if !path.exists() {
            return Ok(None);
        }

        let bars: Vec<DailyBar> = read_csv(&path)?;
        debug!(ts_code = %ts_code, count = bars.len(), "Loaded cached daily bars");
        Ok(Some(bars))
    }

    /// 캐시된 마지막 거래일.
    ///
    /// 파일이 없거나 비어 있으면 `None`. 읽기 오류도 로그를 남기고 `None`으로 취급합니다.
    pub fn latest_trade_date(&self, ts_code: &TsCode) -> Option<NaiveDate> {
        match self.load(ts_code) {
            Ok(Some(bars)) => bars
                .iter()
                .filter_map(|bar| parse_trade_date(&bar.trade_date).ok())
                .max(),
            Ok(None) => None,
            Err(e) => {
                error!(
                    ts_code = %ts_code,
                    path = %self.path(ts_code).display(),
                    error = %e,
                    "Failed to read cached daily file"
                );
                None
            }
        }
    }

    /// 일봉 전체를 원자적으로 저장합니다 (헤더 포함).
    pub fn save(&self, ts_code: &TsCode, bars: &[DailyBar]) -> Result<PathBuf> {
        let path = self.path(ts_code);
        write_csv_atomic(&path, DAILY_COLUMNS, bars)?;
        debug!(ts_code = %ts_code, count = bars.len(), path = %path.display(), "Saved daily bars");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code() -> TsCode {
        TsCode::parse("600519.SH").unwrap()
    }

    fn bar(date: &str) -> DailyBar {
        DailyBar {
            ts_code: "600519.SH".to_string(),
            trade_date: date.to_string(),
            open: dec!(1700.00),
            high: dec!(1720.50),
            low: dec!(1690.10),
            close: dec!(1710.00),
            pre_close: Some(dec!(1700.00)),
            change: Some(dec!(10.00)),
            pct_chg: None,
            vol: Some(dec!(25000.5)),
            amount: Some(dec!(4275000.1)),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());

        assert!(!store.exists(&code()));
        assert!(store.load(&code()).unwrap().is_none());
        assert!(store.latest_trade_date(&code()).is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        let bars = vec![bar("20240102"), bar("20240103")];

        let path = store.save(&code(), &bars).unwrap();
        assert!(path.ends_with("600519.SH.csv"));

        let loaded = store.load(&code()).unwrap().unwrap();
        assert_eq!(loaded, bars);
        assert_eq!(
            store.latest_trade_date(&code()),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with(
            "ts_code,trade_date,open,high,low,close,pre_close,change,pct_chg,vol,amount\n"
        ));
        // 값이 없는 칸은 비워 둠
        assert!(text.contains(",10.00,,25000.5,"));
    }

    #[test]
    fn test_empty_file_has_header_and_no_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());

        store.save(&code(), &[]).unwrap();

        let text = std::fs::read_to_string(store.path(&code())).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(store.latest_trade_date(&code()).is_none());
    }

    #[test]
    fn test_corrupt_file_treated_as_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        std::fs::write(store.path(&code()), "ts_code,trade_date\n600519.SH\n").unwrap();

        assert!(store.load(&code()).is_err());
        assert!(store.latest_trade_date(&code()).is_none());
    }

    #[test]
    fn test_reads_numeric_dates_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        std::fs::write(
            store.path(&code()),
            "ts_code,trade_date,open,high,low,close,pre_close,change,pct_chg,vol,amount\n\
             600519.SH,20240105.0,1,2,0.5,1.5,,,,100,\n",
        )
        .unwrap();

        assert_eq!(
            store.latest_trade_date(&code()),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }
}
