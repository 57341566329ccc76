//! 종목 목록 CSV 저장소.

use std::path::{Path, PathBuf};

use tracing::debug;

use ashare_core::{StockBasic, STOCK_BASIC_FIELDS};

use super::{read_csv, write_csv_atomic};
use crate::error::Result;

/// `stock_basic.csv` 저장소.
#[derive(Debug, Clone)]
pub struct StockBasicStore {
    path: PathBuf,
}

impl StockBasicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 종목 목록을 읽습니다. 파일이 없으면 `None`.
    pub fn load(&self) -> Result<Option<Vec<StockBasic>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let stocks: Vec<StockBasic> = read_csv(&self.path)?;
        debug!(count = stocks.len(), "Loaded stock list");
        Ok(Some(stocks))
    }

    /// 종목 목록을 원자적으로 저장합니다.
    pub fn save(&self, stocks: &[StockBasic]) -> Result<()> {
        let header: Vec<&str> = STOCK_BASIC_FIELDS.split(',').collect();
        write_csv_atomic(&self.path, &header, stocks)
    }

    /// 종목 코드로 항목을 찾습니다.
    pub fn find(&self, ts_code: &str) -> Result<Option<StockBasic>> {
        Ok(self
            .load()?
            .and_then(|stocks| stocks.into_iter().find(|s| s.ts_code == ts_code)))
    }
}
