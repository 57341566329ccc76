//! A주 일봉 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목 목록/일봉 증분 수집
//! - 기술 지표 차트 생성 (SVG, HTML) 및 지표 CSV 내보내기
//! - 캐시된 종목 목록 조회
//! - 전체 흐름 데모

pub mod commands;
