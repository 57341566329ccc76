//! CLI 명령어 구현 모듈.

pub mod demo;
pub mod fetch;
pub mod stocks;
pub mod visualize;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// `YYYY-MM-DD` 날짜를 파싱합니다.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("20240115").is_err());
    }
}
