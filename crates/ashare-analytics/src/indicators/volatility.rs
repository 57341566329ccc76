//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (볼린저 밴드, 표본 표준편차 기준)

use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::ensure_period;
use super::IndicatorResult;

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// 구간 표본 표준편차 (σ).
    pub std_dev: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 중간 밴드 = SMA(period)
    /// σ = 구간 표본 표준편차 (분모 n - 1)
    /// 상단/하단 = 중간 ± k × σ
    ///
    /// 기간이 1이면 표본 표준편차가 정의되지 않으므로 중간 밴드만 채워집니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        ensure_period(period)?;

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(BollingerBandsResult::default());
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let ma = window.iter().sum::<Decimal>() / period_decimal;

            let std_dev = if period > 1 {
                let variance = window
                    .iter()
                    .map(|&p| {
                        let diff = p - ma;
                        diff * diff
                    })
                    .sum::<Decimal>()
                    / Decimal::from(period - 1);
                variance.sqrt()
            } else {
                None
            };

            let (upper, lower) = match std_dev {
                Some(sd) => {
                    let deviation = params.std_dev_multiplier * sd;
                    (Some(ma + deviation), Some(ma - deviation))
                }
                None => (None, None),
            };

            result.push(BollingerBandsResult {
                upper,
                middle: Some(ma),
                lower,
                std_dev,
            });
        }

        Ok(result)
    }
}
