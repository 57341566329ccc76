//! 거래일 파싱 및 포맷.
//!
//! 데이터 제공자는 `YYYYMMDD` 형식을 사용하고, CLI와 설정은 `YYYY-MM-DD`를
//! 사용합니다. 캐시된 CSV를 다시 읽을 때는 숫자(`20240105` 또는
//! `20240105.0`)로 저장된 값도 만날 수 있습니다.

use chrono::NaiveDate;

use crate::error::CoreError;

/// 제공자 거래일 형식.
pub const TRADE_DATE_FORMAT: &str = "%Y%m%d";

/// 사람이 읽는 날짜 형식.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 날짜 문자열에서 `-` 구분자를 제거하고 정수형 표기를 정리합니다.
///
/// `"2024-01-05"`, `"20240105"`, `"20240105.0"` 모두 `"20240105"`가 됩니다.
pub fn normalize_date_str(s: &str) -> String {
    let trimmed = s.trim();
    let without_fraction = match trimmed.split_once('.') {
        Some((int_part, frac)) if frac.chars().all(|c| c == '0') => int_part,
        _ => trimmed,
    };
    without_fraction.replace('-', "")
}

/// 거래일 문자열을 파싱합니다.
///
/// 정리된 값은 정확히 8자리 숫자여야 합니다 (`"2024013"`은 거부).
pub fn parse_trade_date(s: &str) -> Result<NaiveDate, CoreError> {
    let normalized = normalize_date_str(s);
    if normalized.len() != 8 || !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(&normalized, TRADE_DATE_FORMAT)
        .map_err(|_| CoreError::InvalidDate(s.to_string()))
}

/// `YYYY-MM-DD` 형식의 날짜를 파싱합니다 (CLI 입력용).
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|_| CoreError::InvalidDate(format!("{} (expected YYYY-MM-DD)", s)))
}

/// 날짜를 `YYYYMMDD` 형식으로 포맷합니다.
pub fn format_trade_date(date: NaiveDate) -> String {
    date.format(TRADE_DATE_FORMAT).to_string()
}
