//! 증분 일봉 수집기.
//!
//! 로컬 CSV 캐시의 마지막 거래일 이후 구간만 Provider에서 받아와 병합합니다.
//!
//! # 동작 방식
//!
//! 1. 종목 목록이 없으면 먼저 갱신
//! 2. 종목별 캐시의 마지막 거래일 확인
//! 3. 이미 최신이면 건너뜀, 아니면 다음 날부터 종료일까지 조회 (재시도 포함)
//! 4. 기존 데이터와 병합 (거래일 중복 제거, 오름차순) 후 원자적으로 저장
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use ashare_data::{DailyFetcher, FetchSettings, TushareClient};
//!
//! let settings = FetchSettings::from_config(&config, today)?;
//! let fetcher = DailyFetcher::from_config(client, &config, settings);
//! let report = fetcher.fetch_daily(Some(&ts_code)).await?;
//! ```

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use ashare_core::{AppConfig, DailyBar, StockBasic, TsCode};

use crate::error::{DataError, Result};
use crate::provider::MarketDataProvider;
use crate::retry::{retry, RetryPolicy};
use crate::storage::{merge_bars, DailyStore, StockBasicStore};

/// 수집 구간과 배치 설정.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// 캐시가 없을 때의 시작일
    pub start_date: NaiveDate,
    /// 종료일 (포함)
    pub end_date: NaiveDate,
    /// 한 배치에서 처리할 종목 수
    pub batch_size: usize,
    /// Provider 호출 재시도 정책
    pub retry: RetryPolicy,
}

impl FetchSettings {
    /// 설정에서 수집 구간을 계산합니다. 종료일 기본값은 `today`.
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            start_date: config.start_date()?,
            end_date: config.end_date(today)?,
            batch_size: config.data.batch_size.max(1),
            retry: RetryPolicy::from_config(&config.tushare),
        })
    }
}

/// 종목별 수집 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 캐시가 이미 종료일까지 있음 (캐시 내용)
    UpToDate(Vec<DailyBar>),
    /// 새 데이터를 받아 병합함
    Updated {
        /// 병합 후 전체 데이터
        bars: Vec<DailyBar>,
        /// 새로 받은 행 수
        fetched: usize,
    },
    /// 조회 구간에 데이터가 없음 (파일 변경 없음)
    NoData,
    /// 모든 시도 실패
    Failed(String),
}

impl FetchOutcome {
    /// 결과에 포함된 일봉 (있는 경우).
    pub fn bars(&self) -> Option<&[DailyBar]> {
        match self {
            FetchOutcome::UpToDate(bars) | FetchOutcome::Updated { bars, .. } => Some(bars),
            FetchOutcome::NoData | FetchOutcome::Failed(_) => None,
        }
    }
}

/// 수집 결과 요약.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// 종목별 결과
    pub outcomes: BTreeMap<TsCode, FetchOutcome>,
}

impl FetchReport {
    pub fn get(&self, ts_code: &TsCode) -> Option<&FetchOutcome> {
        self.outcomes.get(ts_code)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Updated { .. }))
    }

    pub fn up_to_date(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::UpToDate(_)))
    }

    pub fn no_data(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::NoData))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| pred(o)).count()
    }
}

/// 증분 일봉 수집기.
pub struct DailyFetcher<P> {
    provider: P,
    daily_store: DailyStore,
    basic_store: StockBasicStore,
    settings: FetchSettings,
}

impl<P: MarketDataProvider> DailyFetcher<P> {
    pub fn new(
        provider: P,
        daily_store: DailyStore,
        basic_store: StockBasicStore,
        settings: FetchSettings,
    ) -> Self {
        Self {
            provider,
            daily_store,
            basic_store,
            settings,
        }
    }

    /// 설정의 데이터 경로로 저장소를 구성합니다.
    pub fn from_config(provider: P, config: &AppConfig, settings: FetchSettings) -> Self {
        Self::new(
            provider,
            DailyStore::new(config.daily_dir()),
            StockBasicStore::new(config.stock_basic_path()),
            settings,
        )
    }

    pub fn daily_store(&self) -> &DailyStore {
        &self.daily_store
    }

    pub fn basic_store(&self) -> &StockBasicStore {
        &self.basic_store
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// 종목 목록을 갱신합니다.
    ///
    /// 베이징 거래소 종목과 상장폐지 종목을 제외하고 저장합니다.
    /// 결과가 비어 있으면 파일을 건드리지 않습니다.
    #[instrument(skip(self))]
    pub async fn update_stock_basic(&self) -> Result<Vec<StockBasic>> {
        let all = retry(&self.settings.retry, "stock_basic", || self.provider.stock_basic()).await?;
        let received = all.len();

        let stocks: Vec<StockBasic> = all
            .into_iter()
            .filter(|s| !s.is_beijing_exchange() && s.is_listed())
            .collect();

        if stocks.is_empty() {
            warn!(received = received, "Stock list is empty, not saved");
            return Ok(stocks);
        }

        self.basic_store.save(&stocks)?;
        info!(
            count = stocks.len(),
            filtered = received - stocks.len(),
            path = %self.basic_store.path().display(),
            "Stock list saved"
        );
        Ok(stocks)
    }

    /// 일봉을 증분 수집합니다.
    ///
    /// `ts_code`가 주어지면 해당 종목만, 아니면 종목 목록 전체를 처리합니다.
    pub async fn fetch_daily(&self, ts_code: Option<&TsCode>) -> Result<FetchReport> {
        self.fetch_daily_with_progress(ts_code, |_, _| {}).await
    }

    /// [`fetch_daily`](Self::fetch_daily)와 같지만 종목마다 콜백을 호출합니다.
    pub async fn fetch_daily_with_progress<F>(
        &self,
        ts_code: Option<&TsCode>,
        on_progress: F,
    ) -> Result<FetchReport>
    where
        F: FnMut(&TsCode, &FetchOutcome),
    {
        let codes = self.resolve_targets(ts_code).await?;
        Ok(self.fetch_codes(&codes, on_progress).await)
    }

    /// 이미 결정된 종목들을 `batch_size` 단위로 수집합니다.
    ///
    /// 종목 목록은 읽지 않습니다. 진행률 표시처럼 호출자가 [`resolve_targets`](Self::resolve_targets)로
    /// 목록을 먼저 받은 경우에 사용합니다.
    pub async fn fetch_codes<F>(&self, codes: &[TsCode], mut on_progress: F) -> FetchReport
    where
        F: FnMut(&TsCode, &FetchOutcome),
    {
        let batch_size = self.settings.batch_size.max(1);
        let mut report = FetchReport::default();

        info!(
            count = codes.len(),
            start = %self.settings.start_date,
            end = %self.settings.end_date,
            "Fetching daily bars"
        );

        for (batch_index, batch) in codes.chunks(batch_size).enumerate() {
            debug!(batch = batch_index, size = batch.len(), "Processing batch");
            for code in batch {
                let outcome = self.fetch_one(code).await;
                on_progress(code, &outcome);
                report.outcomes.insert(code.clone(), outcome);
            }
        }

        info!(
            total = report.total(),
            updated = report.updated(),
            up_to_date = report.up_to_date(),
            no_data = report.no_data(),
            failed = report.failed(),
            "Daily fetch finished"
        );

        report
    }

    /// 처리할 종목 목록을 결정합니다.
    ///
    /// 종목 목록 파일이 없으면 먼저 갱신합니다.
    pub async fn resolve_targets(&self, ts_code: Option<&TsCode>) -> Result<Vec<TsCode>> {
        if !self.basic_store.exists() {
            info!("Stock list file missing, fetching");
            self.update_stock_basic().await?;
        }

        let stocks = self.basic_store.load()?.ok_or_else(|| {
            DataError::NotFound(format!(
                "stock list {}",
                self.basic_store.path().display()
            ))
        })?;

        if let Some(code) = ts_code {
            if stocks.iter().any(|s| s.ts_code == code.as_str()) {
                return Ok(vec![code.clone()]);
            }
            return Err(DataError::NotFound(format!(
                "{} is not in the stock list",
                code
            )));
        }

        let mut seen = HashSet::new();
        let mut codes = Vec::with_capacity(stocks.len());
        for stock in &stocks {
            match TsCode::parse(&stock.ts_code) {
                Ok(code) => {
                    if seen.insert(code.clone()) {
                        codes.push(code);
                    }
                }
                Err(e) => warn!(ts_code = %stock.ts_code, error = %e, "Skipping invalid code"),
            }
        }
        Ok(codes)
    }

    /// 한 종목을 증분 수집합니다. 실패는 결과 값으로 돌려줍니다.
    #[instrument(skip_all, fields(ts_code = %ts_code))]
    pub async fn fetch_one(&self, ts_code: &TsCode) -> FetchOutcome {
        let end = self.settings.end_date;
        let latest = self.daily_store.latest_trade_date(ts_code);

        let start = match latest {
            Some(latest) if latest >= end => {
                info!(latest = %latest, "Already up to date");
                return match self.daily_store.load(ts_code) {
                    Ok(bars) => FetchOutcome::UpToDate(bars.unwrap_or_default()),
                    Err(e) => FetchOutcome::Failed(e.to_string()),
                };
            }
            Some(latest) => match latest.succ_opt() {
                Some(next) => next,
                None => return FetchOutcome::Failed(format!("no date after {}", latest)),
            },
            None => self.settings.start_date,
        };

        info!(start = %start, end = %end, "Downloading daily bars");

        let fetched = retry(&self.settings.retry, ts_code.as_str(), || {
            self.provider.daily(ts_code, start, end)
        })
        .await;

        match fetched {
            Ok(fresh) if fresh.is_empty() => {
                warn!(start = %start, end = %end, "No data in range");
                FetchOutcome::NoData
            }
            Ok(fresh) => match self.merge_and_save(ts_code, fresh) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Failed to merge daily bars");
                    FetchOutcome::Failed(e.to_string())
                }
            },
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    fn merge_and_save(&self, ts_code: &TsCode, fresh: Vec<DailyBar>) -> Result<FetchOutcome> {
        let fetched = fresh.len();
        let existing = self.daily_store.load(ts_code)?.unwrap_or_default();
        let bars = merge_bars(existing, fresh);
        self.daily_store.save(ts_code, &bars)?;

        info!(fetched = fetched, total = bars.len(), "Daily bars saved");
        Ok(FetchOutcome::Updated { bars, fetched })
    }
}
