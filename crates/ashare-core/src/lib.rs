//! # A-Share Core
//!
//! A주(중국 본토 주식) 일봉 도구의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 코드(ts_code) 및 거래일 타입
//! - 일봉(OHLCV) 및 종목 기본 정보 구조체
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
