//! A주 일봉 수집 및 차트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 종목 목록 갱신 후 전 종목 일봉 증분 수집
//! ashare fetch --update-list
//!
//! # 平安银行 한 종목만 수집
//! ashare fetch --code 000001.SZ
//!
//! # 최근 1년 지표 차트 + HTML 차트
//! ashare visualize --code 000001.SZ --save-html
//!
//! # 기간 지정, 지표 CSV 내보내기
//! ashare visualize --code 600519.SH --start 2023-01-01 --end 2023-12-31 --export-csv moutai.csv
//!
//! # 캐시된 종목 검색
//! ashare stocks --search 银行 --limit 20
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use ashare_cli::commands::demo::run_demo;
use ashare_cli::commands::fetch::{run_fetch, FetchOptions};
use ashare_cli::commands::parse_date;
use ashare_cli::commands::stocks::{run_stocks, OutputFormat, StocksOptions};
use ashare_cli::commands::visualize::{run_visualize, VisualizeOptions};
use ashare_core::{init_logging, AppConfig, LogConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "ashare")]
#[command(about = "A주 일봉 수집 및 K선 차트 도구 (Tushare Pro 기반)", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 로그 형식 (pretty, json, compact). 생략하면 설정 파일 값 사용
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 일봉 데이터 증분 수집 (Tushare Pro → CSV 캐시)
    Fetch {
        /// 종목 코드 (예: 000001.SZ). 생략하면 전 종목
        #[arg(long)]
        code: Option<String>,

        /// 종목 목록 강제 갱신
        #[arg(long)]
        update_list: bool,
    },

    /// 캐시된 일봉으로 K선 + 기술 지표 차트 생성
    Visualize {
        /// 종목 코드 (예: 000001.SZ)
        #[arg(long)]
        code: String,

        /// 시작 날짜 (YYYY-MM-DD, 기본: 종료일 1년 전)
        #[arg(long)]
        start: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        end: Option<String>,

        /// HTML 차트도 저장
        #[arg(long)]
        save_html: bool,

        /// 지표 없이 캔들+거래량만 그리기
        #[arg(long)]
        basic: bool,

        /// SVG 출력 경로 (기본: 차트 디렉토리)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 지표 계산 결과 CSV 경로
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },

    /// 캐시된 종목 목록 조회
    Stocks {
        /// 검색 키워드 (코드, 이름, 업종)
        #[arg(short, long)]
        search: Option<String>,

        /// 최대 결과 수 (0 = 무제한)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// 출력 형식
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 데모: 000001.SZ 수집 후 2023년 차트 생성
    Demo,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env는 선택 사항
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\n오류: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    let log_config = LogConfig::from_settings(&config.logging, cli.log_format.as_deref())?;
    init_logging(log_config)?;

    config
        .ensure_dirs()
        .context("Failed to create data directories")?;
    info!(config = %cli.config.display(), data_dir = %config.data.data_dir.display(), "Starting");

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Fetch { code, update_list } => {
            let options = FetchOptions { code, update_list };
            run_fetch(&config, &options, today).await?;
        }

        Commands::Visualize {
            code,
            start,
            end,
            save_html,
            basic,
            output,
            export_csv,
        } => {
            let options = VisualizeOptions {
                code,
                start: start.as_deref().map(parse_date).transpose()?,
                end: end.as_deref().map(parse_date).transpose()?,
                save_html,
                basic,
                output,
                export_csv,
            };
            let result = run_visualize(&config, &options, today)?;
            info!(rows = result.rows, chart = %result.chart.display(), "Visualization finished");
        }

        Commands::Stocks {
            search,
            limit,
            format,
        } => {
            let options = StocksOptions {
                search,
                limit,
                format,
            };
            run_stocks(&config, &options)?;
        }

        Commands::Demo => {
            let result = run_demo(&config, today).await?;
            println!("\n데모 완료: {} 거래일", result.rows);
        }
    }

    Ok(())
}
