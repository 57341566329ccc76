//! 단독 HTML 차트 출력.
//!
//! 가격(이동평균 포함)과 거래량 두 패널을 7:3 비율로 그린 SVG를 HTML 문서에 넣어 저장합니다.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plotters::prelude::*;
use tracing::info;

use ashare_analytics::{columns, IndicatorFrame};
use ashare_core::TsCode;

use crate::candlestick::{draw_price_volume, ensure_not_empty};
use crate::error::Result;
use crate::panels::Line;
use crate::style::ChartStyle;

/// HTML 차트에 그리는 이동평균 기간.
pub const HTML_MA_PERIODS: [usize; 5] = [5, 10, 20, 30, 60];

const HTML_RATIOS: [u32; 2] = [7, 3];

/// 차트 제목: `"{name}({ts_code}) K线图 {start} 至 {end}"`.
pub fn chart_title(name: &str, ts_code: &TsCode, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}({}) K线图 {} 至 {}",
        name,
        ts_code,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// HTML 파일명: `<ts_code>_<start>_<end>.html`.
pub fn html_file_name(ts_code: &TsCode, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}_{}_{}.html",
        ts_code,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// 차트를 `out_dir` 아래 HTML 파일로 저장하고 경로를 반환합니다.
pub fn save_plot_to_html(
    frame: &IndicatorFrame,
    title: &str,
    ts_code: &TsCode,
    start: NaiveDate,
    end: NaiveDate,
    theme: &ChartStyle,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    ensure_not_empty(frame.len(), title)?;

    let svg = render_svg(frame, title, theme)?;
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let path = out_dir.join(html_file_name(ts_code, start, end));
    std::fs::write(&path, html_document(title, &svg))?;

    info!(ts_code = %ts_code, path = %path.display(), "HTML chart saved");
    Ok(path)
}

fn render_svg(frame: &IndicatorFrame, title: &str, theme: &ChartStyle) -> Result<String> {
    let lines: Vec<Line<'_>> = HTML_MA_PERIODS
        .iter()
        .enumerate()
        .filter_map(|(i, period)| {
            frame
                .column(&columns::ma(*period))
                .map(|values| Line::new(format!("MA{}", period), values, theme.ma_color(i)))
        })
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (theme.width, theme.height)).into_drawing_area();
        root.fill(&theme.background)?;
        draw_price_volume(&root, frame.candles(), title, &lines, HTML_RATIOS, theme)?;
        root.present()?;
    }
    Ok(svg)
}

fn html_document(title: &str, svg: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>{}</title>
<style>
body {{ margin: 0; background: #ffffff; }}
.chart {{ max-width: 100%; overflow-x: auto; }}
.chart svg {{ display: block; margin: 0 auto; }}
</style>
</head>
<body>
<div class="chart">
{}
</div>
</body>
</html>
"#,
        escape_html(title),
        svg
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_title_and_file_name() {
        let code = TsCode::parse("000001.SZ").unwrap();
        assert_eq!(
            chart_title("平安银行", &code, day(2023, 1, 1), day(2023, 12, 31)),
            "平安银行(000001.SZ) K线图 2023-01-01 至 2023-12-31"
        );
        assert_eq!(
            html_file_name(&code, day(2023, 1, 1), day(2023, 12, 31)),
            "000001.SZ_2023-01-01_2023-12-31.html"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
