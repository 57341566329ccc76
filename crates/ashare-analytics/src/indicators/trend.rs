//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average, `adjust=False` 방식)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간 (span). alpha = 2 / (period + 1).
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None).
    /// 데이터가 기간보다 짧으면 모두 None.
    pub fn sma(
        &self,
        values: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(values.len());
        let mut sum = Decimal::ZERO;

        for (i, value) in values.iter().enumerate() {
            sum += *value;
            if i >= period {
                sum -= values[i - period];
            }

            if i + 1 < period {
                result.push(None);
            } else {
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA[0] = P[0]
    /// EMA[t] = P[t] × α + EMA[t-1] × (1 - α), α = 2 / (period + 1)
    ///
    /// 첫 값부터 정의되며 비어 있는 입력에는 빈 벡터를 반환합니다.
    pub fn ema(
        &self,
        values: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        ensure_period(params.period)?;

        let alpha = dec!(2) / Decimal::from(params.period + 1);
        let series: Vec<Option<Decimal>> = values.iter().copied().map(Some).collect();

        Ok(ewm(&series, alpha))
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        let fast_ema = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow_ema = self.ema(prices, EmaParams { period: params.slow_period })?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| match (fast, slow) {
                (Some(f), Some(s)) => Some(*f - *s),
                _ => None,
            })
            .collect();

        ensure_period(params.signal_period)?;
        let signal_alpha = dec!(2) / Decimal::from(params.signal_period + 1);
        let signal_line = ewm(&macd_line, signal_alpha);

        let result = macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| MacdResult {
                macd,
                signal,
                histogram: match (macd, signal) {
                    (Some(m), Some(s)) => Some(m - s),
                    _ => None,
                },
            })
            .collect();

        Ok(result)
    }
}

/// `adjust=False` 지수 가중 평균.
///
/// 첫 번째 유효 값에서 시작하며, 그 이전은 None입니다.
/// 시작 이후의 결측 값은 직전 평균을 그대로 유지합니다.
pub(crate) fn ewm(values: &[Option<Decimal>], alpha: Decimal) -> Vec<Option<Decimal>> {
    let one_minus_alpha = Decimal::ONE - alpha;
    let mut result = Vec::with_capacity(values.len());
    let mut state: Option<Decimal> = None;

    for value in values {
        state = match (state, value) {
            (None, v) => *v,
            (Some(prev), Some(v)) => Some(*v * alpha + prev * one_minus_alpha),
            (Some(prev), None) => Some(prev),
        };
        result.push(state);
    }

    result
}

pub(crate) fn ensure_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}
