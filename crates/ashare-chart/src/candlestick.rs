//! 기본 K선 차트 (캔들 + 거래량).

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{error, info};

use ashare_core::Candle;

use crate::error::{ChartError, Result};
use crate::panels::{draw_price_panel, draw_volume_panel, split_panels, Line};
use crate::style::ChartStyle;

/// 가격:거래량 패널 비율.
pub const CANDLE_VOLUME_RATIOS: [u32; 2] = [4, 1];

/// K선 차트를 SVG 파일로 저장합니다.
///
/// `volume`이 참이면 가격 아래에 거래량 패널을 4:1 비율로 붙입니다.
/// 데이터가 비어 있으면 파일을 만들지 않고 `ChartError::EmptyData`를 반환합니다.
pub fn plot_candlestick(
    candles: &[Candle],
    title: &str,
    theme: &ChartStyle,
    volume: bool,
    path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let path = path.as_ref();
    ensure_not_empty(candles.len(), title)?;
    ensure_parent(path)?;

    {
        let root = SVGBackend::new(path, (theme.width, theme.height)).into_drawing_area();
        root.fill(&theme.background)?;
        if volume {
            draw_price_volume(&root, candles, title, &[], CANDLE_VOLUME_RATIOS, theme)?;
        } else {
            draw_price_panel(&root, candles, title, &[], true, theme)?;
        }
        root.present()?;
    }

    info!(path = %path.display(), count = candles.len(), "Candlestick chart saved");
    Ok(path.to_path_buf())
}

/// 가격 패널과 거래량 패널을 주어진 비율로 그립니다.
pub(crate) fn draw_price_volume<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    candles: &[Candle],
    title: &str,
    overlays: &[Line<'_>],
    ratios: [u32; 2],
    theme: &ChartStyle,
) -> Result<()> {
    let panels = split_panels(root, &ratios);
    let [price, volume] = panels.as_slice() else {
        return Err(ChartError::Render("failed to split chart panels".to_string()));
    };
    draw_price_panel(price, candles, title, overlays, false, theme)?;
    draw_volume_panel(volume, candles, &[], true, theme)
}

pub(crate) fn ensure_not_empty(len: usize, title: &str) -> Result<()> {
    if len == 0 {
        error!(title, "No data, chart not drawn");
        return Err(ChartError::EmptyData(title.to_string()));
    }
    Ok(())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
