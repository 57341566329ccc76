//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index, 단순 이동평균 방식)
//! - KDJ (RSV 기반 스토캐스틱 변형)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::{ensure_period, ewm};
use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// KDJ 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KdjParams {
    /// RSV 계산 기간 (기본: 9).
    pub rsv_period: usize,
    /// K 평활 계수의 역수 (alpha = 1 / k_smooth, 기본: 3).
    pub k_smooth: usize,
    /// D 평활 계수의 역수 (alpha = 1 / d_smooth, 기본: 3).
    pub d_smooth: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self {
            rsv_period: 9,
            k_smooth: 3,
            d_smooth: 3,
        }
    }
}

/// KDJ 결과.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KdjResult {
    /// K 값.
    pub k: Option<Decimal>,
    /// D 값 (K의 지수 평활).
    pub d: Option<Decimal>,
    /// J 값 (3K - 2D).
    pub j: Option<Decimal>,
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭 (기간 내 단순 평균)
    ///
    /// 첫 번째 변화량은 0으로 간주하므로 처음 period-1개가 None입니다.
    /// 하락이 없고 상승만 있으면 100, 둘 다 없으면 None.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;

        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            let delta = if i == 0 {
                Decimal::ZERO
            } else {
                prices[i] - prices[i - 1]
            };
            gains.push(delta.max(Decimal::ZERO));
            losses.push((-delta).max(Decimal::ZERO));
        }

        let period_decimal = Decimal::from(period);
        let mut gain_sum = Decimal::ZERO;
        let mut loss_sum = Decimal::ZERO;
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            gain_sum += gains[i];
            loss_sum += losses[i];
            if i >= period {
                gain_sum -= gains[i - period];
                loss_sum -= losses[i - period];
            }

            if i + 1 < period {
                result.push(None);
                continue;
            }

            let avg_gain = gain_sum / period_decimal;
            let avg_loss = loss_sum / period_decimal;

            let value = if avg_loss.is_zero() {
                if avg_gain.is_zero() {
                    None
                } else {
                    Some(dec!(100))
                }
            } else {
                let rs = avg_gain / avg_loss;
                Some(dec!(100) - dec!(100) / (Decimal::ONE + rs))
            };
            result.push(value);
        }

        Ok(result)
    }

    /// KDJ 계산.
    ///
    /// RSV = 100 × (종가 - N일 최저가) / (N일 최고가 - N일 최저가)
    /// K = RSV의 지수 평활 (alpha = 1/k_smooth), D = K의 지수 평활, J = 3K - 2D
    ///
    /// N일 고저 범위가 0이면 RSV는 50입니다.
    pub fn kdj(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: KdjParams,
    ) -> IndicatorResult<Vec<KdjResult>> {
        ensure_period(params.rsv_period)?;
        ensure_period(params.k_smooth)?;
        ensure_period(params.d_smooth)?;

        if high.len() != low.len() || low.len() != close.len() {
            return Err(IndicatorError::InvalidParameter(format!(
                "고가/저가/종가 길이가 다릅니다: {}/{}/{}",
                high.len(),
                low.len(),
                close.len()
            )));
        }

        let n = params.rsv_period;
        let rsv: Vec<Option<Decimal>> = (0..close.len())
            .map(|i| {
                if i + 1 < n {
                    return None;
                }
                let start = i + 1 - n;
                let highest = high[start..=i].iter().copied().max()?;
                let lowest = low[start..=i].iter().copied().min()?;
                let range = highest - lowest;
                if range.is_zero() {
                    Some(dec!(50))
                } else {
                    Some(dec!(100) * (close[i] - lowest) / range)
                }
            })
            .collect();

        let k_alpha = Decimal::ONE / Decimal::from(params.k_smooth);
        let d_alpha = Decimal::ONE / Decimal::from(params.d_smooth);
        let k_line = ewm(&rsv, k_alpha);
        let d_line = ewm(&k_line, d_alpha);

        let result = k_line
            .into_iter()
            .zip(d_line)
            .map(|(k, d)| KdjResult {
                k,
                d,
                j: match (k, d) {
                    (Some(k), Some(d)) => Some(dec!(3) * k - dec!(2) * d),
                    _ => None,
                },
            })
            .collect();

        Ok(result)
    }
}
