//! 플랫 파일(CSV) 저장소.
//!
//! - `DailyStore`: 종목별 일봉 CSV (`<dir>/<ts_code>.csv`)
//! - `StockBasicStore`: 종목 목록 CSV (`stock_basic.csv`)
//!
//! 모든 쓰기는 `<파일>.tmp`에 먼저 기록한 뒤 rename으로 교체합니다.

pub mod daily;
pub mod stock_basic;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use ashare_core::{normalize_date_str, DailyBar};

use crate::error::Result;

pub use daily::DailyStore;
pub use stock_basic::StockBasicStore;

/// 기존 일봉과 새 일봉을 병합합니다.
///
/// 기존 → 새 순서로 이어 붙인 뒤 `trade_date` 기준으로 중복을 제거하고
/// (나중 값 우선), 거래일 오름차순으로 정렬합니다.
pub fn merge_bars(existing: Vec<DailyBar>, fresh: Vec<DailyBar>) -> Vec<DailyBar> {
    let mut by_date: BTreeMap<String, DailyBar> = BTreeMap::new();

    for mut bar in existing.into_iter().chain(fresh) {
        let key = normalize_date_str(&bar.trade_date);
        bar.trade_date = key.clone();
        by_date.insert(key, bar);
    }

    by_date.into_values().collect()
}

/// 임시 파일 경로 (`<name>.tmp`).
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// 레코드를 CSV로 원자적으로 저장합니다.
///
/// 레코드가 없어도 헤더는 항상 기록합니다.
pub(crate) fn write_csv_atomic<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = tmp_path(path);
    let written = match write_csv(&tmp, header, records) {
        Ok(()) => fs::rename(&tmp, path).map_err(Into::into),
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_csv<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV 파일 전체를 읽습니다.
pub(crate) fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn bar(date: &str, close: Decimal) -> DailyBar {
        DailyBar {
            ts_code: "000001.SZ".to_string(),
            trade_date: date.to_string(),
            open: close,
            high: close,
            low: close,
            close,
            pre_close: None,
            change: None,
            pct_chg: None,
            vol: Some(dec!(100)),
            amount: None,
        }
    }

    #[test]
    fn test_merge_fresh_wins_and_sorted() {
        let existing = vec![bar("20240103", dec!(10)), bar("20240102", dec!(9))];
        let fresh = vec![bar("20240104", dec!(11)), bar("20240103", dec!(10.5))];

        let merged = merge_bars(existing, fresh);

        let dates: Vec<&str> = merged.iter().map(|b| b.trade_date.as_str()).collect();
        assert_eq!(dates, vec!["20240102", "20240103", "20240104"]);
        assert_eq!(merged[1].close, dec!(10.5));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = vec![bar("20240102", dec!(9)), bar("20240103", dec!(10))];
        let fresh = vec![bar("20240103", dec!(10)), bar("20240104", dec!(11))];

        let once = merge_bars(existing, fresh.clone());
        let twice = merge_bars(once.clone(), fresh);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_normalizes_numeric_dates() {
        let merged = merge_bars(vec![bar("20240102.0", dec!(9))], vec![bar("20240102", dec!(9.1))]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].trade_date, "20240102");
        assert_eq!(merged[0].close, dec!(9.1));
    }

    #[test]
    fn test_tmp_path() {
        let path = Path::new("data/daily/000001.SZ.csv");
        assert_eq!(tmp_path(path), PathBuf::from("data/daily/000001.SZ.csv.tmp"));
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("x.csv");

        write_csv_atomic(&path, ashare_core::DAILY_COLUMNS, &[bar("20240102", dec!(9))]).unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        let rows: Vec<DailyBar> = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    /// 직렬화에 항상 실패하는 행
    struct BrokenRow;

    impl Serialize for BrokenRow {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("broken row"))
        }
    }

    #[test]
    fn test_failed_write_removes_tmp_and_keeps_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.csv");
        write_csv_atomic(&path, ashare_core::DAILY_COLUMNS, &[bar("20240102", dec!(9))]).unwrap();
        let before = fs::read(&path).unwrap();

        let result = write_csv_atomic(&path, &["a"], &[BrokenRow]);

        assert!(result.is_err());
        assert!(!tmp_path(&path).exists());
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
