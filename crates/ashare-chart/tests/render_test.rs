//! SVG/HTML 렌더링 통합 테스트

use ashare_analytics::{calculate_all_indicators, IndicatorFrame, IndicatorSettings};
use ashare_chart::{
    chart_title, plot_candlestick, plot_with_indicators, save_plot_to_html, ChartError,
    ChartStyle,
};
use ashare_core::{Candle, TsCode};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

/// 오르내림이 섞인 캔들 `n`개.
fn candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let wave = Decimal::from((i % 7) as i64) - dec!(3);
            let close = dec!(12) + Decimal::from(i as i64) * dec!(0.05) + wave * dec!(0.1);
            let open = if i % 2 == 0 { close - dec!(0.08) } else { close + dec!(0.08) };
            Candle {
                date: start() + Duration::days(i as i64),
                open,
                high: close + dec!(0.3),
                low: close - dec!(0.3),
                close,
                volume: dec!(250000) + Decimal::from((i * 1000) as i64),
            }
        })
        .collect()
}

fn frame(n: usize) -> IndicatorFrame {
    calculate_all_indicators(candles(n), &IndicatorSettings::default()).unwrap()
}

fn title() -> String {
    let code = TsCode::parse("000001.SZ").unwrap();
    chart_title("平安银行", &code, start(), start() + Duration::days(89))
}

#[test]
fn test_plot_candlestick_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let style = ChartStyle::default();

    let with_volume = plot_candlestick(&candles(90), &title(), &style, true, dir.path().join("a.svg")).unwrap();
    let price_only = plot_candlestick(&candles(90), &title(), &style, false, dir.path().join("b.svg")).unwrap();

    for path in [with_volume, price_only] {
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
    }
}

#[test]
fn test_plot_with_indicators_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("chart.svg");

    let written = plot_with_indicators(
        &frame(90),
        &title(),
        &IndicatorSettings::default(),
        &ChartStyle::default(),
        &path,
    )
    .unwrap();

    assert_eq!(written, path);
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("MACD"));
    assert!(svg.contains("KDJ"));
}

#[test]
fn test_plot_with_indicators_short_series() {
    // 지표 대부분이 None이어도 그려진다
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.svg");
    plot_with_indicators(
        &frame(3),
        &title(),
        &IndicatorSettings::default(),
        &ChartStyle::default(),
        &path,
    )
    .unwrap();
    assert!(path.exists());
}

#[test]
fn test_save_plot_to_html() {
    let dir = tempfile::tempdir().unwrap();
    let code = TsCode::parse("000001.SZ").unwrap();
    let end = start() + Duration::days(89);

    let path = save_plot_to_html(
        &frame(90),
        &title(),
        &code,
        start(),
        end,
        &ChartStyle::default(),
        dir.path(),
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "000001.SZ_2023-01-02_2023-04-01.html"
    );
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>平安银行(000001.SZ) K线图 2023-01-02 至 2023-04-01</title>"));
    assert!(html.contains("<svg"));
}

#[test]
fn test_empty_data_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");

    let result = plot_candlestick(&[], "empty", &ChartStyle::default(), true, &path);
    assert!(matches!(result, Err(ChartError::EmptyData(_))));
    assert!(!path.exists());

    let empty = IndicatorFrame::new(Vec::new());
    let code = TsCode::parse("000001.SZ").unwrap();
    let result = save_plot_to_html(&empty, "empty", &code, start(), start(), &ChartStyle::default(), dir.path());
    assert!(matches!(result, Err(ChartError::EmptyData(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
