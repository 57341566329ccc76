//! 종목 코드(ts_code) 정의.
//!
//! Tushare 형식의 거래소 한정 종목 코드를 다룹니다:
//! - `Exchange` - 상하이/선전/베이징 거래소
//! - `TsCode` - 검증된 `<6자리 숫자>.<거래소>` 코드 (예: "000001.SZ")

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 상장 거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    /// 상하이 증권거래소
    Shanghai,
    /// 선전 증권거래소
    Shenzhen,
    /// 베이징 증권거래소
    Beijing,
}

impl Exchange {
    /// 코드 접미사 (SH, SZ, BJ).
    pub fn suffix(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "SH",
            Exchange::Shenzhen => "SZ",
            Exchange::Beijing => "BJ",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SH" => Some(Exchange::Shanghai),
            "SZ" => Some(Exchange::Shenzhen),
            "BJ" => Some(Exchange::Beijing),
            _ => None,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// 거래소 한정 종목 코드.
///
/// 내부적으로 정규화된 문자열(대문자 접미사)을 보관하므로
/// 파일명과 API 파라미터에 그대로 사용할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TsCode(String);

impl TsCode {
    /// 문자열을 파싱하여 종목 코드를 생성합니다.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        let (symbol, suffix) = trimmed
            .split_once('.')
            .ok_or_else(|| CoreError::InvalidTsCode(s.to_string()))?;

        if symbol.len() != 6 || !symbol.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidTsCode(s.to_string()));
        }

        let exchange =
            Exchange::from_suffix(suffix).ok_or_else(|| CoreError::InvalidTsCode(s.to_string()))?;

        Ok(Self(format!("{}.{}", symbol, exchange.suffix())))
    }

    /// 6자리 종목 번호를 반환합니다.
    pub fn symbol(&self) -> &str {
        &self.0[..6]
    }

    /// 상장 거래소를 반환합니다.
    pub fn exchange(&self) -> Exchange {
        // parse()에서 검증된 접미사만 저장된다
        Exchange::from_suffix(&self.0[7..]).unwrap_or(Exchange::Shenzhen)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TsCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TsCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TsCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TsCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TsCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        let code = TsCode::parse("000001.SZ").unwrap();
        assert_eq!(code.as_str(), "000001.SZ");
        assert_eq!(code.symbol(), "000001");
        assert_eq!(code.exchange(), Exchange::Shenzhen);

        let code = TsCode::parse("600519.sh").unwrap();
        assert_eq!(code.to_string(), "600519.SH");
        assert_eq!(code.exchange(), Exchange::Shanghai);

        let code: TsCode = " 830799.BJ ".parse().unwrap();
        assert_eq!(code.exchange(), Exchange::Beijing);
    }

    #[test]
    fn test_parse_invalid_codes() {
        assert!(TsCode::parse("000001").is_err());
        assert!(TsCode::parse("00001.SZ").is_err());
        assert!(TsCode::parse("00000A.SZ").is_err());
        assert!(TsCode::parse("000001.HK").is_err());
        assert!(TsCode::parse("").is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let code = TsCode::parse("000001.SZ").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"000001.SZ\"");

        let back: TsCode = serde_json::from_str("\"600000.sh\"").unwrap();
        assert_eq!(back.as_str(), "600000.SH");
        assert!(serde_json::from_str::<TsCode>("\"bogus\"").is_err());
    }
}
