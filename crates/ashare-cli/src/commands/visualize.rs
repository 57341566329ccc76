//! 차트 생성 명령어.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use ashare_analytics::{calculate_all_indicators, IndicatorSettings};
use ashare_chart::{
    chart_title, plot_candlestick, plot_with_indicators, save_plot_to_html, ChartStyle,
};
use ashare_core::{AppConfig, TsCode};
use ashare_data::{default_window, get_stock_name, prepare_for_visualization, DailyStore, StockBasicStore};

/// 차트 명령 옵션.
#[derive(Debug, Clone, Default)]
pub struct VisualizeOptions {
    pub code: String,
    /// 시작일 (없으면 종료일 1년 전)
    pub start: Option<NaiveDate>,
    /// 종료일 (없으면 오늘)
    pub end: Option<NaiveDate>,
    /// HTML 차트도 저장
    pub save_html: bool,
    /// 지표 없이 캔들+거래량만 그림
    pub basic: bool,
    /// SVG 출력 경로 (없으면 차트 디렉토리)
    pub output: Option<PathBuf>,
    /// 지표 CSV 내보내기 경로
    pub export_csv: Option<PathBuf>,
}

/// 생성된 파일 경로.
#[derive(Debug, Clone)]
pub struct VisualizeOutput {
    pub chart: PathBuf,
    pub html: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    /// 차트에 포함된 거래일 수
    pub rows: usize,
}

/// 캐시된 일봉으로 차트를 만듭니다.
pub fn run_visualize(
    config: &AppConfig,
    options: &VisualizeOptions,
    today: NaiveDate,
) -> Result<VisualizeOutput> {
    let ts_code = TsCode::parse(&options.code)
        .with_context(|| format!("Invalid ts_code: {}", options.code))?;

    let (start, end) = resolve_window(options.start, options.end, today);
    if start > end {
        bail!("Start date {} is after end date {}", start, end);
    }

    let store = DailyStore::new(config.daily_dir());
    let candles = prepare_for_visualization(&store, &ts_code, Some(start), Some(end))
        .with_context(|| format!("Failed to read cached data for {}", ts_code))?
        .with_context(|| {
            format!(
                "No cached data for {}. Run `ashare fetch --code {}` first",
                ts_code, ts_code
            )
        })?;
    if candles.is_empty() {
        bail!("No data for {} between {} and {}", ts_code, start, end);
    }

    let settings = IndicatorSettings::from(&config.indicators);
    let frame = calculate_all_indicators(candles, &settings)
        .context("Failed to calculate indicators")?;

    let name = get_stock_name(&StockBasicStore::new(config.stock_basic_path()), &ts_code);
    let title = chart_title(&name, &ts_code, start, end);
    let theme = ChartStyle::from_config(&config.chart);

    let chart_path = options.output.clone().unwrap_or_else(|| {
        config.data.charts_dir.join(format!(
            "{}_{}_{}.svg",
            ts_code,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ))
    });

    let chart = if options.basic {
        plot_candlestick(frame.candles(), &title, &theme, true, &chart_path)
    } else {
        plot_with_indicators(&frame, &title, &settings, &theme, &chart_path)
    }
    .with_context(|| format!("Failed to render chart {}", chart_path.display()))?;
    println!("차트 저장: {}", chart.display());

    let html = if options.save_html {
        let path = save_plot_to_html(
            &frame,
            &title,
            &ts_code,
            start,
            end,
            &theme,
            &config.data.charts_dir,
        )
        .context("Failed to save HTML chart")?;
        println!("HTML 차트 저장: {}", path.display());
        Some(path)
    } else {
        None
    };

    let csv = match &options.export_csv {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            frame
                .to_csv(BufWriter::new(file))
                .context("Failed to write indicator CSV")?;
            info!(path = %path.display(), "Indicators exported");
            println!("지표 CSV 저장: {}", path.display());
            Some(path.clone())
        }
        None => None,
    };

    Ok(VisualizeOutput {
        chart,
        html,
        csv,
        rows: frame.len(),
    })
}

/// 생략된 경계를 채웁니다. 종료일 기본값은 `today`, 시작일 기본값은 종료일 1년 전.
fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| default_window(end).0);
    (start, end)
}
