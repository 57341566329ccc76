//! 일봉 수집 명령어.
//!
//! 종목 목록이 없거나 `--update-list`가 주어지면 목록을 먼저 갱신한 뒤,
//! 한 종목 또는 목록 전체의 일봉을 증분 수집합니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ashare_core::{AppConfig, TsCode};
use ashare_data::{
    DailyFetcher, FetchOutcome, FetchReport, FetchSettings, MarketDataProvider, TushareClient,
};

/// 수집 명령 옵션.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// 대상 종목 (없으면 전체)
    pub code: Option<String>,
    /// 종목 목록 강제 갱신
    pub update_list: bool,
}

/// Tushare 클라이언트로 수집을 실행합니다. 종료일 기본값은 `today`.
pub async fn run_fetch(
    config: &AppConfig,
    options: &FetchOptions,
    today: NaiveDate,
) -> Result<FetchReport> {
    let client = TushareClient::new(&config.tushare).context("Failed to create Tushare client")?;
    let settings =
        FetchSettings::from_config(config, today).context("Invalid fetch date settings")?;
    let fetcher = DailyFetcher::from_config(client, config, settings);

    fetch_with(&fetcher, options).await
}

/// 주어진 수집기로 수집을 실행하고 요약을 출력합니다.
pub async fn fetch_with<P: MarketDataProvider>(
    fetcher: &DailyFetcher<P>,
    options: &FetchOptions,
) -> Result<FetchReport> {
    if options.update_list {
        let stocks = fetcher
            .update_stock_basic()
            .await
            .context("Failed to update stock list")?;
        println!("종목 목록 갱신: {} 종목", stocks.len());
    }

    let report = match &options.code {
        Some(code) => {
            let ts_code =
                TsCode::parse(code).with_context(|| format!("Invalid ts_code: {}", code))?;
            info!(ts_code = %ts_code, "Fetching single stock");
            fetcher
                .fetch_daily(Some(&ts_code))
                .await
                .with_context(|| format!("Failed to fetch daily data for {}", ts_code))?
        }
        None => fetch_all_with_progress(fetcher).await?,
    };

    print_summary(&report);
    Ok(report)
}

async fn fetch_all_with_progress<P: MarketDataProvider>(
    fetcher: &DailyFetcher<P>,
) -> Result<FetchReport> {
    let codes = fetcher
        .resolve_targets(None)
        .await
        .context("Failed to load stock list")?;

    let pb = ProgressBar::new(codes.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let report = fetcher
        .fetch_codes(&codes, |code, outcome| {
            pb.set_message(code.to_string());
            if let FetchOutcome::Failed(e) = outcome {
                pb.println(format!("✗ {}: {}", code, e));
            }
            pb.inc(1);
        })
        .await;
    pb.finish_with_message("done");

    Ok(report)
}

fn print_summary(report: &FetchReport) {
    println!("\n일봉 수집 완료: {} 종목", report.total());
    println!("  갱신: {}", report.updated());
    println!("  최신 상태: {}", report.up_to_date());
    println!("  데이터 없음: {}", report.no_data());
    println!("  실패: {}", report.failed());

    for (code, outcome) in &report.outcomes {
        match outcome {
            FetchOutcome::Updated { bars, fetched } if report.total() == 1 => {
                println!("  {}: 신규 {} 행, 전체 {} 행", code, fetched, bars.len());
            }
            FetchOutcome::Failed(e) => println!("  ✗ {}: {}", code, e),
            _ => {}
        }
    }
}
