//! 데이터 모듈 오류 타입.

use ashare_core::CoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터 가져오기 오류 (네트워크, HTTP 상태)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Tushare API가 0이 아닌 code를 반환
    #[error("API error (code {code}): {msg}")]
    ApiError { code: i64, msg: String },

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 파일 입출력 오류
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV 읽기/쓰기 오류
    #[error("CSV error: {0}")]
    CsvError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DataError {
    /// 재시도로 복구될 수 있는 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::FetchError(_) | DataError::ApiError { .. })
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

impl From<CoreError> for DataError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(msg) => DataError::ConfigError(msg),
            CoreError::Io(io) => DataError::IoError(io),
            other => DataError::InvalidData(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
