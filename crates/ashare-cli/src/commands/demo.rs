//! 수집부터 차트까지 한 번에 실행하는 데모.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use ashare_core::AppConfig;

use super::fetch::{run_fetch, FetchOptions};
use super::parse_date;
use super::visualize::{run_visualize, VisualizeOptions, VisualizeOutput};

/// 데모 종목 (平安银行).
pub const DEMO_CODE: &str = "000001.SZ";
pub const DEMO_START: &str = "2023-01-01";
pub const DEMO_END: &str = "2023-12-31";

/// 데모 종목을 수집하고 2023년 지표 차트와 HTML 차트를 만듭니다.
pub async fn run_demo(config: &AppConfig, today: NaiveDate) -> Result<VisualizeOutput> {
    let start = parse_date(DEMO_START)?;
    let end = parse_date(DEMO_END)?;

    println!("1단계: {} 일봉 수집", DEMO_CODE);
    let fetch = FetchOptions {
        code: Some(DEMO_CODE.to_string()),
        update_list: false,
    };
    run_fetch(config, &fetch, today)
        .await
        .context("Demo fetch failed")?;

    println!("\n2단계: {} ~ {} 차트 생성", start, end);
    info!(ts_code = DEMO_CODE, start = %start, end = %end, "Rendering demo charts");
    let options = VisualizeOptions {
        code: DEMO_CODE.to_string(),
        start: Some(start),
        end: Some(end),
        save_html: true,
        ..VisualizeOptions::default()
    };
    run_visualize(config, &options, today).context("Demo chart failed")
}
