//! 기술적 지표 모듈.
//!
//! 일봉 차트에 표시되는 기술적 지표를 `Decimal` 기반으로 계산합니다.
//! 모든 함수는 입력 행마다 하나의 값을 반환하며, 기간이 부족한 행은 `None`입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표
//! - **SMA**: 단순 이동평균
//! - **EMA**: 지수 이동평균 (첫 값에서 시작)
//! - **MACD**: 12/26/9
//!
//! ## 모멘텀 지표
//! - **RSI**: 단순 이동평균 방식 RSI
//! - **KDJ**: 9/3/3
//!
//! ## 변동성 지표
//! - **Bollinger Bands**: 20일, 2σ
//!
//! ## 거래량 지표
//! - **거래량 이동평균**: 5/10/20일
//!
//! # 사용 예시
//!
//! ```ignore
//! use ashare_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let ma20 = engine.sma(&closes, SmaParams { period: 20 })?;
//! let rsi = engine.rsi(&closes, RsiParams::default())?;
//! ```

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use rust_decimal::Decimal;
use thiserror::Error;

pub use momentum::{KdjParams, KdjResult, MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};
pub use volume::{VolumeIndicators, DEFAULT_VOLUME_MA_PERIODS};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 개별 계산기를 하나의 인터페이스로 묶습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    volume: VolumeIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, values: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(values, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, values: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(values, params)
    }

    /// MACD 계산.
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// KDJ 계산.
    pub fn kdj(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: KdjParams,
    ) -> IndicatorResult<Vec<KdjResult>> {
        self.momentum.kdj(high, low, close, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    // ==================== 거래량 지표 ====================

    /// 거래량 이동평균 계산.
    pub fn volume_ma(
        &self,
        volume: &[Decimal],
        periods: &[usize],
    ) -> IndicatorResult<Vec<(usize, Vec<Option<Decimal>>)>> {
        self.volume.volume_ma(volume, periods)
    }
}
