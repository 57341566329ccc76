//! 기술 지표 패널이 포함된 K선 차트.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::full_palette;
use tracing::{debug, info};

use ashare_analytics::{columns, IndicatorFrame, IndicatorSettings};

use crate::candlestick::{ensure_not_empty, ensure_parent};
use crate::error::Result;
use crate::panels::{
    build_panel, draw_guide, draw_lines, draw_price_panel, draw_signed_bars, draw_volume_panel,
    padded_range, points, split_panels, Line,
};
use crate::style::ChartStyle;

const BAND_COLOR: RGBColor = RGBColor(160, 160, 160);
const J_COLOR: RGBColor = RGBColor(0, 128, 0);

/// RSI 과매도/과매수 기준선.
const RSI_GUIDES: [f64; 2] = [30.0, 70.0];

/// 차트 패널 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// 캔들 + 이동평균 + 볼린저 밴드
    Price,
    /// 거래량 + 거래량 이동평균
    Volume,
    Macd,
    Rsi,
    Kdj,
}

impl Panel {
    /// 세로 비율. 가격 패널 4, 나머지 1.
    pub fn ratio(self) -> u32 {
        match self {
            Panel::Price => 4,
            _ => 1,
        }
    }
}

/// 설정에서 켜진 패널 목록 (위에서 아래 순서).
pub fn panel_layout(settings: &IndicatorSettings) -> Vec<Panel> {
    let mut layout = vec![Panel::Price, Panel::Volume];
    if settings.show_macd {
        layout.push(Panel::Macd);
    }
    if settings.show_rsi {
        layout.push(Panel::Rsi);
    }
    if settings.show_kdj {
        layout.push(Panel::Kdj);
    }
    layout
}

/// 지표 패널이 포함된 차트를 SVG 파일로 저장합니다.
///
/// 전체 높이는 패널 수에 비례해 늘어납니다.
pub fn plot_with_indicators(
    frame: &IndicatorFrame,
    title: &str,
    settings: &IndicatorSettings,
    theme: &ChartStyle,
    path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let path = path.as_ref();
    ensure_not_empty(frame.len(), title)?;
    ensure_parent(path)?;

    let layout = panel_layout(settings);
    let size = (theme.width, theme.scaled_height(layout.len()));
    debug!(panels = ?layout, width = size.0, height = size.1, "Drawing indicator chart");

    {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_indicator_chart(&root, frame, title, settings, &layout, theme)?;
        root.present()?;
    }

    info!(path = %path.display(), rows = frame.len(), "Indicator chart saved");
    Ok(path.to_path_buf())
}

fn draw_indicator_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &IndicatorFrame,
    title: &str,
    settings: &IndicatorSettings,
    layout: &[Panel],
    theme: &ChartStyle,
) -> Result<()> {
    root.fill(&theme.background)?;

    let ratios: Vec<u32> = layout.iter().map(|p| p.ratio()).collect();
    let areas = split_panels(root, &ratios);
    let candles = frame.candles();
    let last = layout.len().saturating_sub(1);

    for (i, (panel, area)) in layout.iter().zip(&areas).enumerate() {
        let show_dates = i == last;
        match panel {
            Panel::Price => draw_price_panel(
                area,
                candles,
                title,
                &price_overlays(frame, settings, theme),
                show_dates,
                theme,
            )?,
            Panel::Volume => {
                draw_volume_panel(area, candles, &volume_lines(frame, theme), show_dates, theme)?
            }
            Panel::Macd => draw_macd_panel(area, frame, show_dates, theme)?,
            Panel::Rsi => draw_rsi_panel(area, frame, show_dates, theme)?,
            Panel::Kdj => draw_kdj_panel(area, frame, show_dates, theme)?,
        }
    }
    Ok(())
}

fn column<'a>(frame: &'a IndicatorFrame, name: &str) -> &'a [Option<rust_decimal::Decimal>] {
    frame.column(name).unwrap_or(&[])
}

fn price_overlays<'a>(
    frame: &'a IndicatorFrame,
    settings: &IndicatorSettings,
    theme: &ChartStyle,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = settings
        .ma_periods
        .iter()
        .enumerate()
        .filter_map(|(i, period)| {
            frame
                .column(&columns::ma(*period))
                .map(|values| Line::new(format!("MA{}", period), values, theme.ma_color(i)))
        })
        .collect();

    if settings.show_boll {
        lines.push(Line::new("", column(frame, columns::BOLL_UPPER), BAND_COLOR));
        lines.push(Line::new("BOLL", column(frame, columns::BOLL_MID), full_palette::GREY));
        lines.push(Line::new("", column(frame, columns::BOLL_LOWER), BAND_COLOR));
    }
    lines
}

fn volume_lines<'a>(frame: &'a IndicatorFrame, theme: &ChartStyle) -> Vec<Line<'a>> {
    [5usize, 10]
        .iter()
        .enumerate()
        .filter_map(|(i, period)| {
            frame
                .column(&columns::volume_ma(*period))
                .map(|values| Line::new(format!("MA{}", period), values, theme.ma_color(i)))
        })
        .collect()
}

fn draw_macd_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &IndicatorFrame,
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<()> {
    let macd = column(frame, columns::MACD);
    let signal = column(frame, columns::MACD_SIGNAL);
    let hist = column(frame, columns::MACD_HIST);

    let values = [macd, signal, hist]
        .into_iter()
        .flat_map(points)
        .map(|(_, y)| y)
        .chain(std::iter::once(0.0));
    let mut chart = build_panel(
        area,
        frame.candles(),
        padded_range(values),
        None,
        "MACD",
        show_dates,
        theme,
    )?;

    draw_signed_bars(&mut chart, hist, theme)?;
    draw_guide(&mut chart, frame.len(), 0.0, theme.foreground)?;
    draw_lines(
        &mut chart,
        &[
            Line::new("MACD", macd, BLUE),
            Line::new("Signal", signal, RED),
        ],
        theme,
    )
}

fn draw_rsi_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &IndicatorFrame,
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<()> {
    let mut chart = build_panel(area, frame.candles(), 0.0..100.0, None, "RSI", show_dates, theme)?;
    for guide in RSI_GUIDES {
        draw_guide(&mut chart, frame.len(), guide, RED)?;
    }
    draw_lines(
        &mut chart,
        &[Line::new("RSI", column(frame, columns::RSI), full_palette::PURPLE)],
        theme,
    )
}

fn draw_kdj_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &IndicatorFrame,
    show_dates: bool,
    theme: &ChartStyle,
) -> Result<()> {
    let k = column(frame, columns::KDJ_K);
    let d = column(frame, columns::KDJ_D);
    let j = column(frame, columns::KDJ_J);

    let values = [k, d, j].into_iter().flat_map(points).map(|(_, y)| y);
    let mut chart = build_panel(
        area,
        frame.candles(),
        padded_range(values),
        None,
        "KDJ",
        show_dates,
        theme,
    )?;
    draw_lines(
        &mut chart,
        &[
            Line::new("K", k, BLUE),
            Line::new("D", d, RED),
            Line::new("J", j, J_COLOR),
        ],
        theme,
    )
}
