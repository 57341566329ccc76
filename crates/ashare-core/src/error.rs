//! 핵심 에러 타입.
//!
//! 이 모듈은 워크스페이스 전반에서 공유되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 종목 코드
    #[error("잘못된 종목 코드: {0}")]
    InvalidTsCode(String),

    /// 잘못된 날짜
    #[error("잘못된 날짜: {0}")]
    InvalidDate(String),

    /// 파일 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
