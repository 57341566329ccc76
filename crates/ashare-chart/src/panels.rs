//! 패널 단위 그리기 도구.
//!
//! x축은 거래일 인덱스이고 라벨만 날짜로 표시합니다. 휴장일 공백이 생기지 않습니다.

use std::ops::Range;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use ashare_core::Candle;

use crate::error::Result;
use crate::style::ChartStyle;

/// x축 라벨 개수.
const X_LABELS: usize = 8;
/// y축 라벨 영역 너비 (px).
const Y_LABEL_AREA: u32 = 70;

pub(crate) type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// 이름과 색상이 붙은 선 데이터.
pub(crate) struct Line<'a> {
    pub label: String,
    pub values: &'a [Option<Decimal>],
    pub color: RGBColor,
}

impl<'a> Line<'a> {
    pub fn new(label: impl Into<String>, values: &'a [Option<Decimal>], color: RGBColor) -> Self {
        Self {
            label: label.into(),
            values,
            color,
        }
    }
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// 값이 있는 지점만 (인덱스, 값)으로 변환합니다.
pub(crate) fn points(values: &[Option<Decimal>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.and_then(|d| d.to_f64()).map(|y| (i as f64, y)))
        .collect()
}

/// 최소/최대에 5% 여백을 둔 범위. 값이 없거나 하나뿐이어도 빈 범위가 되지 않습니다.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

pub(crate) fn x_range(len: usize) -> Range<f64> {
    -0.5..(len as f64 - 0.5)
}

pub(crate) fn date_label(candles: &[Candle], x: f64) -> String {
    let index = x.round();
    if index < 0.0 {
        return String::new();
    }
    candles
        .get(index as usize)
        .map(|c| c.date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 영역을 세로 비율대로 나눕니다.
pub(crate) fn split_panels<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    ratios: &[u32],
) -> Vec<DrawingArea<DB, Shift>> {
    let Some((_, head)) = ratios.split_last() else {
        return Vec::new();
    };
    let total: u32 = ratios.iter().sum::<u32>().max(1);
    let (_, height) = area.dim_in_pixel();

    let mut panels = Vec::with_capacity(ratios.len());
    let mut rest = area.clone();
    for ratio in head {
        let (top, bottom) = rest.split_vertically(height * ratio / total);
        panels.push(top);
        rest = bottom;
    }
    panels.push(rest);
    panels
}

/// 축과 격자가 그려진 패널을 만듭니다. `show_dates`가 거짓이면 x축 라벨 영역을 두지 않습니다.
pub(crate) fn build_panel<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    candles: &[Candle],
    y_range: Range<f64>,
    caption: Option<&str>,
    y_desc: &str,
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<PanelChart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin_left(10)
        .margin_right(20)
        .margin_top(6)
        .margin_bottom(4)
        .x_label_area_size(if show_dates { 28 } else { 0 })
        .y_label_area_size(Y_LABEL_AREA);
    if let Some(title) = caption {
        builder.caption(title, ("sans-serif", 22).into_font().color(&theme.foreground));
    }
    let mut chart = builder.build_cartesian_2d(x_range(candles.len()), y_range)?;

    let x_formatter = |x: &f64| {
        if show_dates {
            date_label(candles, *x)
        } else {
            String::new()
        }
    };
    let y_formatter = |y: &f64| compact_number(*y);
    chart
        .configure_mesh()
        .x_labels(X_LABELS)
        .y_labels(5)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .y_desc(y_desc)
        .label_style(("sans-serif", 12).into_font().color(&theme.foreground))
        .axis_desc_style(("sans-serif", 13).into_font().color(&theme.foreground))
        .axis_style(&theme.foreground)
        .bold_line_style(&theme.grid)
        .light_line_style(&theme.background)
        .draw()?;

    Ok(chart)
}

/// 큰 값은 만/억 단위로 줄여 표시합니다.
fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e8 {
        format!("{:.1}亿", value / 1e8)
    } else if abs >= 1e4 {
        format!("{:.1}万", value / 1e4)
    } else if abs >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// 캔들 몸통 너비 (px).
pub(crate) fn candle_width<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, len: usize) -> u32 {
    let (width, _) = area.dim_in_pixel();
    let plot_width = width.saturating_sub(Y_LABEL_AREA + 30) as f64;
    ((plot_width / len.max(1) as f64 * 0.7) as u32).max(1)
}

/// 선들을 그리고 범례를 붙입니다.
pub(crate) fn draw_lines<'a, DB: DrawingBackend + 'a>(
    chart: &mut PanelChart<'a, DB>,
    lines: &[Line<'_>],
    theme: &ChartStyle,
) -> Result<()> {
    let mut labelled = false;
    for line in lines {
        let color = line.color;
        let anno = chart.draw_series(LineSeries::new(points(line.values), color.stroke_width(1)))?;
        if !line.label.is_empty() {
            anno.label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
            labelled = true;
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", 12).into_font().color(&theme.foreground))
            .background_style(&theme.background)
            .border_style(&theme.grid)
            .draw()?;
    }
    Ok(())
}

/// 가격 패널: 캔들과 겹쳐 그릴 선.
pub(crate) fn draw_price_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    candles: &[Candle],
    title: &str,
    overlays: &[Line<'_>],
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<()> {
    let mut values: Vec<f64> = candles
        .iter()
        .flat_map(|c| [to_f64(c.low), to_f64(c.high)])
        .collect();
    for overlay in overlays {
        values.extend(points(overlay.values).into_iter().map(|(_, y)| y));
    }

    let mut chart = build_panel(
        area,
        candles,
        padded_range(values),
        Some(title),
        "价格",
        show_dates,
        theme,
    )?;

    let width = candle_width(area, candles.len());
    chart.draw_series(candles.iter().enumerate().map(|(i, c)| {
        CandleStick::new(
            i as f64,
            to_f64(c.open),
            to_f64(c.high),
            to_f64(c.low),
            to_f64(c.close),
            theme.up_color.filled(),
            theme.down_color.filled(),
            width,
        )
    }))?;

    draw_lines(&mut chart, overlays, theme)
}

/// 거래량 패널: 상승/하락 색상 막대와 거래량 이동평균.
pub(crate) fn draw_volume_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    candles: &[Candle],
    averages: &[Line<'_>],
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<()> {
    let max = candles
        .iter()
        .map(|c| to_f64(c.volume))
        .fold(0.0_f64, f64::max);
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };

    let mut chart = build_panel(area, candles, 0.0..y_max, None, "成交量", show_dates, theme)?;
    chart.draw_series(candles.iter().enumerate().map(|(i, c)| {
        let color = if c.close >= c.open {
            theme.up_color
        } else {
            theme.down_color
        };
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, to_f64(c.volume))], color.filled())
    }))?;

    draw_lines(&mut chart, averages, theme)
}

/// 0을 기준으로 한 막대 (MACD 히스토그램).
pub(crate) fn draw_signed_bars<'a, DB: DrawingBackend + 'a>(
    chart: &mut PanelChart<'a, DB>,
    values: &[Option<Decimal>],
    theme: &ChartStyle,
) -> Result<()> {
    chart.draw_series(points(values).into_iter().map(|(x, y)| {
        let color = if y >= 0.0 {
            theme.up_color
        } else {
            theme.down_color
        };
        Rectangle::new([(x - 0.3, 0.0), (x + 0.3, y)], color.mix(0.6).filled())
    }))?;
    Ok(())
}

/// 가로 기준선.
pub(crate) fn draw_guide<'a, DB: DrawingBackend + 'a>(
    chart: &mut PanelChart<'a, DB>,
    len: usize,
    y: f64,
    color: RGBColor,
) -> Result<()> {
    let range = x_range(len);
    chart.draw_series(LineSeries::new(
        vec![(range.start, y), (range.end, y)],
        color.mix(0.5).stroke_width(1),
    ))?;
    Ok(())
}
