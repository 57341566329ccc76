//! 캐시된 종목 목록 조회.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use ashare_core::{AppConfig, StockBasic};
use ashare_data::StockBasicStore;

/// 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// 종목 조회 옵션.
#[derive(Debug, Clone, Default)]
pub struct StocksOptions {
    /// 검색 키워드 (코드, 이름, 업종)
    pub search: Option<String>,
    /// 최대 결과 수 (0 = 무제한)
    pub limit: usize,
    pub format: OutputFormat,
}

/// 종목 목록을 출력하고 출력한 종목 수를 반환합니다.
pub fn run_stocks(config: &AppConfig, options: &StocksOptions) -> Result<usize> {
    let store = StockBasicStore::new(config.stock_basic_path());
    let stocks = store
        .load()
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .with_context(|| {
            format!(
                "Stock list not found at {}. Run `ashare fetch --update-list` first",
                store.path().display()
            )
        })?;

    let selected = filter_stocks(&stocks, options.search.as_deref(), options.limit);
    info!(total = stocks.len(), selected = selected.len(), "Listing stocks");

    let content = match options.format {
        OutputFormat::Table => format_table(&selected),
        OutputFormat::Csv => format_csv(&selected)?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&selected).context("Failed to serialize to JSON")?
        }
    };
    println!("{}", content);

    Ok(selected.len())
}

/// 키워드와 개수 제한을 적용합니다. 키워드는 대소문자를 구분하지 않습니다.
pub fn filter_stocks<'a>(
    stocks: &'a [StockBasic],
    search: Option<&str>,
    limit: usize,
) -> Vec<&'a StockBasic> {
    let keyword = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let matches = stocks.iter().filter(|stock| match &keyword {
        Some(k) => [&stock.ts_code, &stock.symbol, &stock.name, &stock.industry]
            .iter()
            .any(|field| field.to_lowercase().contains(k.as_str())),
        None => true,
    });

    if limit > 0 {
        matches.take(limit).collect()
    } else {
        matches.collect()
    }
}

fn format_table(stocks: &[&StockBasic]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<10} {:<8} {:<12} {:<10} {:<8} {:<10}\n",
        "TS_CODE", "SYMBOL", "NAME", "INDUSTRY", "MARKET", "LIST_DATE"
    ));
    output.push_str(&"-".repeat(63));
    output.push('\n');

    for stock in stocks {
        output.push_str(&format!(
            "{:<10} {:<8} {:<12} {:<10} {:<8} {:<10}\n",
            stock.ts_code,
            stock.symbol,
            truncate(&stock.name, 12),
            truncate(&stock.industry, 10),
            stock.market,
            stock.list_date
        ));
    }

    output.push_str(&format!("\nTotal: {} stocks", stocks.len()));
    output
}

/// CSV 헤더.
const CSV_HEADER: [&str; 7] = ["ts_code", "symbol", "name", "area", "industry", "market", "list_date"];

fn format_csv(stocks: &[&StockBasic]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for stock in stocks {
        writer.write_record([
            &stock.ts_code,
            &stock.symbol,
            &stock.name,
            &stock.area,
            &stock.industry,
            &stock.market,
            &stock.list_date,
        ])?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

/// 문자열 자르기 (문자 단위).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
