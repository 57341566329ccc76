//! 거래량 지표.

use rust_decimal::Decimal;

use super::trend::{SmaParams, TrendIndicators};
use super::IndicatorResult;

/// 기본 거래량 이동평균 기간.
pub const DEFAULT_VOLUME_MA_PERIODS: [usize; 3] = [5, 10, 20];

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators {
    trend: TrendIndicators,
}

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기간별 거래량 이동평균.
    ///
    /// 입력 기간 순서대로 `(기간, 값)` 쌍을 반환합니다.
    pub fn volume_ma(
        &self,
        volume: &[Decimal],
        periods: &[usize],
    ) -> IndicatorResult<Vec<(usize, Vec<Option<Decimal>>)>> {
        periods
            .iter()
            .map(|&period| {
                let values = self.trend.sma(volume, SmaParams { period })?;
                Ok((period, values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_volume_ma_periods() {
        let indicators = VolumeIndicators::new();
        let volume: Vec<Decimal> = (1..=20).map(Decimal::from).collect();

        let result = indicators
            .volume_ma(&volume, &DEFAULT_VOLUME_MA_PERIODS)
            .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].0, 5);
        // (16 + 17 + 18 + 19 + 20) / 5 = 18
        assert_eq!(result[0].1[19], Some(dec!(18)));
        assert!(result[1].1[8].is_none());
        // 1..=20 평균 = 10.5
        assert_eq!(result[2].1[19], Some(dec!(10.5)));
    }

    #[test]
    fn test_volume_ma_rejects_zero() {
        let indicators = VolumeIndicators::new();
        assert!(indicators.volume_ma(&[dec!(1)], &[5, 0]).is_err());
    }
}
