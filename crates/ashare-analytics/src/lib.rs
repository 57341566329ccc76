//! 일봉 기술적 지표 계산.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (SMA, EMA, MACD, RSI, KDJ, 볼린저 밴드, 거래량 이동평균)
//! - 캔들과 지표 컬럼을 묶은 [`IndicatorFrame`]
//!
//! # Re-exports
//!
//! - [`indicators`]: 개별 지표 계산기와 파라미터
//! - [`frame`]: 전체 지표 계산과 CSV 내보내기

pub mod frame;
pub mod indicators;

pub use frame::{calculate_all_indicators, columns, IndicatorFrame, IndicatorSettings};

// Indicators 모듈 re-exports
pub use indicators::{
    // 변동성 지표
    BollingerBandsParams,
    BollingerBandsResult,
    // 추세 지표
    EmaParams,
    // 엔진
    IndicatorEngine,
    IndicatorError,
    IndicatorResult,
    // 모멘텀 지표
    KdjParams,
    KdjResult,
    MacdParams,
    MacdResult,
    MomentumCalculator,
    RsiParams,
    SmaParams,
    TrendIndicators,
    VolatilityIndicators,
    // 거래량 지표
    VolumeIndicators,
    DEFAULT_VOLUME_MA_PERIODS,
};
