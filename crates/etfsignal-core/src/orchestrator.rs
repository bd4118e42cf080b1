//! Batch orchestrator.
//!
//! Fans the fund universe out over a bounded worker pool, runs fetch +
//! indicators per fund, and folds the results into one dated snapshot. A
//! fund's failure becomes a report entry; only a run with zero successes is
//! a batch-level error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;

use etfsignal_store::{FeeCache, FeeRecord, SnapshotRecord};

use crate::client::MarketData;
use crate::{indicators, BatchError, FundId, FundSpec, IndicatorResult, TradingDate};

/// Worker pool bounds; the default stays within the provider's informal
/// request tolerance for a universe of hundreds of funds.
pub const DEFAULT_WORKERS: usize = 6;
const MAX_WORKERS: usize = 16;

/// One fund that produced no snapshot row, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundFailure {
    pub fund: FundId,
    pub reason: String,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub date: TradingDate,
    /// Successful rows, in universe order.
    pub rows: Vec<SnapshotRecord>,
    /// Failed funds, in universe order.
    pub failures: Vec<FundFailure>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.rows.len()
    }
}

/// Drives one run over a fund universe.
pub struct Orchestrator {
    market: Arc<dyn MarketData>,
    fees: Arc<FeeCache>,
    workers: usize,
    cancel: Arc<AtomicBool>,
}

impl Orchestrator {
    pub fn new(market: Arc<dyn MarketData>, fees: Arc<FeeCache>) -> Self {
        Self {
            market,
            fees,
            workers: DEFAULT_WORKERS,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Handle the caller can use to abort the run between fund dispatches.
    /// In-flight fetches drain; funds never dispatched are reported as
    /// failures so nothing goes missing silently.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the pipeline for `as_of` over `universe`.
    pub async fn run(
        &self,
        universe: &[FundSpec],
        as_of: TradingDate,
    ) -> Result<RunReport, BatchError> {
        if universe.is_empty() {
            return Err(BatchError::EmptyUniverse);
        }

        tracing::info!(funds = universe.len(), workers = self.workers, %as_of, "starting run");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(universe.len());
        let mut skipped = Vec::new();

        for (index, spec) in universe.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                skipped.extend(universe[index..].iter().map(|spec| FundFailure {
                    fund: spec.id.clone(),
                    reason: String::from("run cancelled before dispatch"),
                }));
                tracing::warn!(remaining = universe.len() - index, "run cancelled; draining in-flight funds");
                break;
            }

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let market = Arc::clone(&self.market);
            let fees = Arc::clone(&self.fees);
            let spec = spec.clone();
            let fund = spec.id.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                process_fund(market.as_ref(), fees.as_ref(), &spec, as_of).await
            });
            handles.push((fund, handle));
        }

        let mut rows = Vec::new();
        let mut failures = Vec::new();
        for (fund, handle) in handles {
            match handle.await {
                Ok(Ok(record)) => rows.push(record),
                Ok(Err(reason)) => {
                    tracing::warn!(%fund, %reason, "fund failed");
                    failures.push(FundFailure { fund, reason });
                }
                Err(join_error) => {
                    tracing::error!(%fund, %join_error, "fund task aborted");
                    failures.push(FundFailure {
                        fund,
                        reason: format!("task aborted: {join_error}"),
                    });
                }
            }
        }
        failures.extend(skipped);

        if rows.is_empty() {
            let first_reason = failures
                .first()
                .map(|failure| failure.reason.clone())
                .unwrap_or_else(|| String::from("no funds were attempted"));
            return Err(BatchError::AllFundsFailed {
                attempted: universe.len(),
                first_reason,
            });
        }

        tracing::info!(succeeded = rows.len(), failed = failures.len(), "run finished");

        Ok(RunReport {
            date: as_of,
            rows,
            failures,
        })
    }
}

/// Fetch + compute for a single fund. Returns the flattened row or the
/// reason string that goes into the failure list.
async fn process_fund(
    market: &dyn MarketData,
    fees: &FeeCache,
    spec: &FundSpec,
    as_of: TradingDate,
) -> Result<SnapshotRecord, String> {
    let fee = match fees.get(spec.id.as_str()) {
        Some(cached) => Some(cached),
        None => match market.fee(&spec.id).await {
            Ok(fetched) => {
                fees.put(spec.id.as_str(), fetched.clone());
                Some(fetched)
            }
            // Fees are cosmetic next to the signals; a missing fee degrades
            // the row instead of failing the fund.
            Err(error) => {
                tracing::warn!(fund = %spec.id, %error, "fee fetch failed; row continues without fees");
                None
            }
        },
    };

    let daily = market
        .daily_bars(&spec.id)
        .await
        .map_err(|error| format!("daily bars: {error}"))?;
    let weekly = market
        .weekly_bars(&spec.id)
        .await
        .map_err(|error| format!("weekly bars: {error}"))?;

    let indicators = indicators::evaluate(&daily, &weekly);
    Ok(build_record(as_of, spec, fee, indicators))
}

fn build_record(
    as_of: TradingDate,
    spec: &FundSpec,
    fee: Option<FeeRecord>,
    indicators: IndicatorResult,
) -> SnapshotRecord {
    SnapshotRecord {
        date: as_of.format_iso(),
        code: spec.id.to_string(),
        name: spec.name.clone(),
        management_rate: fee.as_ref().map(|fee| fee.management_rate),
        custody_rate: fee.as_ref().map(|fee| fee.custody_rate),
        latest_close: indicators.latest_close,
        ma60: indicators.ma60,
        ma_relation: indicators.ma_relation.as_str().to_owned(),
        ma_cross: indicators
            .ma_cross
            .map(|cross| cross.as_str().to_owned())
            .unwrap_or_default(),
        macd_dif: indicators.macd.map(|macd| macd.dif),
        macd_dea: indicators.macd.map(|macd| macd.dea),
        macd_histogram: indicators.macd.map(|macd| macd.histogram),
        macd_flip: indicators
            .macd_flip
            .map(|flip| flip.as_str().to_owned())
            .unwrap_or_default(),
    }
}
