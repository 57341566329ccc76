//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 우선순위: 기본값 < TOML 파일 < `ASHARE__*` 환경 변수 < `TUSHARE_TOKEN`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::{parse_iso_date, TsCode};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tushare API 설정
    pub tushare: TushareConfig,
    /// 데이터 저장 설정
    pub data: DataConfig,
    /// 차트 설정
    pub chart: ChartConfig,
    /// 기술 지표 설정
    pub indicators: IndicatorConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// Tushare Pro API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TushareConfig {
    /// API 토큰
    pub token: String,
    /// API 엔드포인트
    pub api_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 최대 시도 횟수 (첫 요청 포함)
    pub max_retries: u32,
    /// 재시도 간 대기 (밀리초)
    pub retry_delay_ms: u64,
}

impl Default for TushareConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: "http://api.tushare.pro".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 500,
        }
    }
}

/// 데이터 저장 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 데이터 디렉토리
    pub data_dir: PathBuf,
    /// 차트 출력 디렉토리
    pub charts_dir: PathBuf,
    /// 캐시가 없을 때의 수집 시작일 (YYYY-MM-DD)
    pub start_date: String,
    /// 수집 종료일 (YYYY-MM-DD, 없으면 오늘)
    pub end_date: Option<String>,
    /// 전 종목 수집 시 배치 크기
    pub batch_size: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            charts_dir: PathBuf::from("charts"),
            start_date: "2020-01-01".to_string(),
            end_date: None,
            batch_size: 10,
        }
    }
}

/// 차트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// 차트 너비 (px)
    pub width: u32,
    /// 차트 높이 (px)
    pub height: u32,
    /// 상승 캔들 색상
    pub up_color: String,
    /// 하락 캔들 색상
    pub down_color: String,
    /// 배경 스타일 (yahoo, classic, ...)
    pub style: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            up_color: "red".to_string(),
            down_color: "green".to_string(),
            style: "yahoo".to_string(),
        }
    }
}

/// 차트에 표시할 기술 지표 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// MACD 표시
    pub macd: bool,
    /// RSI 표시
    pub rsi: bool,
    /// KDJ 표시
    pub kdj: bool,
    /// 볼린저 밴드 표시
    pub boll: bool,
    /// 이동평균 기간 목록 (비어 있으면 표시하지 않음)
    pub ma: Vec<usize>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            macd: true,
            rsi: true,
            kdj: true,
            boll: true,
            ma: vec![5, 10, 20, 30, 60],
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ASHARE")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if config.tushare.token.is_empty() {
            if let Ok(token) = std::env::var("TUSHARE_TOKEN") {
                config.tushare.token = token;
            }
        }

        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, CoreError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 수집 시작일.
    pub fn start_date(&self) -> Result<NaiveDate, CoreError> {
        parse_iso_date(&self.data.start_date)
    }

    /// 수집 종료일. 설정이 없으면 `today`.
    pub fn end_date(&self, today: NaiveDate) -> Result<NaiveDate, CoreError> {
        match &self.data.end_date {
            Some(s) if !s.trim().is_empty() => parse_iso_date(s),
            _ => Ok(today),
        }
    }

    /// 일봉 CSV 디렉토리.
    pub fn daily_dir(&self) -> PathBuf {
        self.data.data_dir.join("daily")
    }

    /// 종목 목록 CSV 경로.
    pub fn stock_basic_path(&self) -> PathBuf {
        self.data.data_dir.join("stock_basic.csv")
    }

    /// 종목별 일봉 CSV 경로.
    pub fn daily_path(&self, ts_code: &TsCode) -> PathBuf {
        self.daily_dir().join(format!("{}.csv", ts_code))
    }

    /// 데이터/차트 디렉토리를 생성합니다.
    pub fn ensure_dirs(&self) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.data.data_dir)?;
        std::fs::create_dir_all(self.daily_dir())?;
        std::fs::create_dir_all(&self.data.charts_dir)?;
        Ok(())
    }
}
