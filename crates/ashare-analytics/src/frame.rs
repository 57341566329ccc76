//! 캔들 + 지표 컬럼 프레임.
//!
//! [`calculate_all_indicators`]는 캔들 목록에서 모든 지표를 계산해
//! 이름 있는 컬럼으로 묶습니다. 차트 렌더링과 CSV 내보내기가 이 프레임을 사용합니다.

use std::io::Write;

use ashare_core::{Candle, IndicatorConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::indicators::{
    BollingerBandsParams, IndicatorEngine, IndicatorError, IndicatorResult, KdjParams,
    MacdParams, RsiParams, SmaParams, DEFAULT_VOLUME_MA_PERIODS,
};

/// 고정 컬럼 이름.
pub mod columns {
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const MACD_HIST: &str = "macd_hist";
    pub const RSI: &str = "rsi";
    pub const KDJ_K: &str = "kdj_k";
    pub const KDJ_D: &str = "kdj_d";
    pub const KDJ_J: &str = "kdj_j";
    pub const BOLL_MID: &str = "boll_mid";
    pub const BOLL_STD: &str = "boll_std";
    pub const BOLL_UPPER: &str = "boll_upper";
    pub const BOLL_LOWER: &str = "boll_lower";

    /// 가격 이동평균 컬럼 이름 (`ma{period}`).
    pub fn ma(period: usize) -> String {
        format!("ma{}", period)
    }

    /// 거래량 이동평균 컬럼 이름 (`volume_ma{period}`).
    pub fn volume_ma(period: usize) -> String {
        format!("volume_ma{}", period)
    }
}

/// 지표 계산 및 표시 설정.
///
/// 계산은 항상 모든 지표에 대해 수행하고, 표시 여부 플래그는 차트에서 사용합니다.
#[derive(Debug, Clone)]
pub struct IndicatorSettings {
    /// 가격 이동평균 기간
    pub ma_periods: Vec<usize>,
    /// 거래량 이동평균 기간
    pub volume_ma_periods: Vec<usize>,
    /// MACD 표시
    pub show_macd: bool,
    /// RSI 표시
    pub show_rsi: bool,
    /// KDJ 표시
    pub show_kdj: bool,
    /// 볼린저 밴드 표시
    pub show_boll: bool,
    pub macd: MacdParams,
    pub rsi: RsiParams,
    pub kdj: KdjParams,
    pub boll: BollingerBandsParams,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self::from(&IndicatorConfig::default())
    }
}

impl From<&IndicatorConfig> for IndicatorSettings {
    fn from(config: &IndicatorConfig) -> Self {
        Self {
            ma_periods: config.ma.clone(),
            volume_ma_periods: DEFAULT_VOLUME_MA_PERIODS.to_vec(),
            show_macd: config.macd,
            show_rsi: config.rsi,
            show_kdj: config.kdj,
            show_boll: config.boll,
            macd: MacdParams::default(),
            rsi: RsiParams::default(),
            kdj: KdjParams::default(),
            boll: BollingerBandsParams::default(),
        }
    }
}

/// 캔들과 지표 컬럼 묶음.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    candles: Vec<Candle>,
    columns: Vec<(String, Vec<Option<Decimal>>)>,
}

impl IndicatorFrame {
    /// 지표 컬럼 없이 캔들만으로 프레임을 만듭니다.
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            columns: Vec::new(),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 첫 거래일과 마지막 거래일.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.candles.first(), self.candles.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// 이름으로 컬럼을 조회합니다.
    pub fn column(&self, name: &str) -> Option<&[Option<Decimal>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// 추가된 순서대로 모든 컬럼을 순회합니다.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<Decimal>])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// 컬럼 이름 목록.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// 컬럼을 추가하거나 같은 이름의 컬럼을 교체합니다.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<Decimal>>,
    ) -> IndicatorResult<()> {
        let name = name.into();
        if values.len() != self.candles.len() {
            return Err(IndicatorError::InvalidParameter(format!(
                "컬럼 {} 길이({})가 캔들 수({})와 다릅니다",
                name,
                values.len(),
                self.candles.len()
            )));
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// 캔들과 지표 컬럼을 CSV로 내보냅니다.
    ///
    /// 헤더는 `date,open,high,low,close,volume` 다음에 컬럼 순서대로 이어지며,
    /// 값이 없는 칸은 비워 둡니다.
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["date", "open", "high", "low", "close", "volume"];
        header.extend(self.columns.iter().map(|(name, _)| name.as_str()));
        wtr.write_record(&header)?;

        for (i, candle) in self.candles.iter().enumerate() {
            let mut record = vec![
                candle.date.format("%Y-%m-%d").to_string(),
                candle.open.to_string(),
                candle.high.to_string(),
                candle.low.to_string(),
                candle.close.to_string(),
                candle.volume.to_string(),
            ];
            record.extend(
                self.columns
                    .iter()
                    .map(|(_, values)| values[i].map(|v| v.normalize().to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

/// 캔들 목록에서 모든 지표를 계산합니다.
///
/// 기간보다 짧은 데이터는 오류가 아니라 `None` 컬럼이 됩니다.
/// 기간이 0인 설정은 [`IndicatorError::InvalidParameter`]를 반환합니다.
pub fn calculate_all_indicators(
    candles: Vec<Candle>,
    settings: &IndicatorSettings,
) -> IndicatorResult<IndicatorFrame> {
    let engine = IndicatorEngine::new();

    let high: Vec<Decimal> = candles.iter().map(|c| c.high).collect();
    let low: Vec<Decimal> = candles.iter().map(|c| c.low).collect();
    let close: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
    let volume: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();

    let mut frame = IndicatorFrame::new(candles);

    for &period in &settings.ma_periods {
        let values = engine.sma(&close, SmaParams { period })?;
        frame.insert_column(columns::ma(period), values)?;
    }

    let macd = engine.macd(&close, settings.macd)?;
    frame.insert_column(columns::MACD, macd.iter().map(|m| m.macd).collect())?;
    frame.insert_column(columns::MACD_SIGNAL, macd.iter().map(|m| m.signal).collect())?;
    frame.insert_column(columns::MACD_HIST, macd.iter().map(|m| m.histogram).collect())?;

    frame.insert_column(columns::RSI, engine.rsi(&close, settings.rsi)?)?;

    let kdj = engine.kdj(&high, &low, &close, settings.kdj)?;
    frame.insert_column(columns::KDJ_K, kdj.iter().map(|r| r.k).collect())?;
    frame.insert_column(columns::KDJ_D, kdj.iter().map(|r| r.d).collect())?;
    frame.insert_column(columns::KDJ_J, kdj.iter().map(|r| r.j).collect())?;

    let boll = engine.bollinger_bands(&close, settings.boll)?;
    frame.insert_column(columns::BOLL_MID, boll.iter().map(|b| b.middle).collect())?;
    frame.insert_column(columns::BOLL_STD, boll.iter().map(|b| b.std_dev).collect())?;
    frame.insert_column(columns::BOLL_UPPER, boll.iter().map(|b| b.upper).collect())?;
    frame.insert_column(columns::BOLL_LOWER, boll.iter().map(|b| b.lower).collect())?;

    for (period, values) in engine.volume_ma(&volume, &settings.volume_ma_periods)? {
        frame.insert_column(columns::volume_ma(period), values)?;
    }

    debug!(
        rows = frame.len(),
        columns = frame.columns.len(),
        "Indicators calculated"
    );

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candles(n: usize) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| {
                let base = Decimal::from(10 + i as i64);
                Candle {
                    date: start + chrono::Duration::days(i as i64),
                    open: base,
                    high: base + dec!(1),
                    low: base - dec!(1),
                    close: base + dec!(0.5),
                    volume: Decimal::from(1000 + i as i64),
                }
            })
            .collect()
    }

    #[test]
    fn test_all_columns_present() {
        let frame = calculate_all_indicators(candles(70), &IndicatorSettings::default()).unwrap();

        assert_eq!(frame.len(), 70);
        for name in [
            "ma5", "ma10", "ma20", "ma30", "ma60", "macd", "macd_signal", "macd_hist", "rsi",
            "kdj_k", "kdj_d", "kdj_j", "boll_mid", "boll_std", "boll_upper", "boll_lower",
            "volume_ma5", "volume_ma10", "volume_ma20",
        ] {
            let column = frame.column(name).unwrap_or_else(|| panic!("missing {name}"));
            assert_eq!(column.len(), 70);
        }

        assert!(frame.column("ma60").unwrap()[58].is_none());
        assert!(frame.column("ma60").unwrap()[59].is_some());
        assert!(frame.column("macd").unwrap()[0].is_some());
    }

    #[test]
    fn test_short_series_is_all_none() {
        let frame = calculate_all_indicators(candles(3), &IndicatorSettings::default()).unwrap();

        assert!(frame.column("ma5").unwrap().iter().all(Option::is_none));
        assert!(frame.column("boll_upper").unwrap().iter().all(Option::is_none));
        assert!(frame.column("kdj_k").unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_empty_candles() {
        let frame = calculate_all_indicators(Vec::new(), &IndicatorSettings::default()).unwrap();
        assert!(frame.is_empty());
        assert!(frame.date_range().is_none());
        assert_eq!(frame.column("rsi").unwrap().len(), 0);
    }

    #[test]
    fn test_zero_ma_period_rejected() {
        let settings = IndicatorSettings {
            ma_periods: vec![0],
            ..IndicatorSettings::default()
        };
        assert!(calculate_all_indicators(candles(10), &settings).is_err());
    }

    #[test]
    fn test_insert_column_length_checked() {
        let mut frame = IndicatorFrame::new(candles(2));
        assert!(frame.insert_column("x", vec![None]).is_err());
        frame.insert_column("x", vec![None, Some(dec!(1))]).unwrap();
        frame.insert_column("x", vec![Some(dec!(2)), None]).unwrap();
        assert_eq!(frame.column_names(), vec!["x"]);
        assert_eq!(frame.column("x").unwrap()[0], Some(dec!(2)));
    }

    #[test]
    fn test_to_csv() {
        let settings = IndicatorSettings {
            ma_periods: vec![2],
            ..IndicatorSettings::default()
        };
        let frame = calculate_all_indicators(candles(2), &settings).unwrap();

        let mut buf = Vec::new();
        frame.to_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("date,open,high,low,close,volume,ma2,macd"));

        let first = lines.next().unwrap();
        assert!(first.starts_with("2023-01-02,10,11,9,10.5,1000,,0"));

        let second = lines.next().unwrap();
        // ma2 = (10.5 + 11.5) / 2
        assert!(second.starts_with("2023-01-03,11,12,10,11.5,1001,11,"));
    }
}
