//! # etfsignal-core
//!
//! Core pipeline for the etfsignal ETF tracker: fetch daily/weekly klines
//! and fee metadata for a universe of funds, derive the MA60 relationship
//! and the weekly MACD triple per fund, and fold the results into one dated
//! snapshot.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Provider seam: transport, retry, throttling, Sina/Eastmoney adapters |
//! | [`domain`] | Validated domain types (fund codes, dates, bars, indicator values) |
//! | [`indicators`] | Pure indicator engine (SMA relation, SMA-seeded MACD) |
//! | [`orchestrator`] | Bounded-concurrency batch runner with per-fund failure isolation |
//!
//! ## Failure model
//!
//! One fund's fetch failure is a value in the run report, never a batch
//! abort; only a run where every fund fails surfaces as [`BatchError`].
//! Missing history is not an error at all — it shows up as typed
//! unavailability in [`IndicatorResult`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use etfsignal_core::{FeeCache, FundId, FundSpec, LiveMarketData, Orchestrator, TradingDate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let universe = vec![FundSpec::new(FundId::parse("510300")?, "CSI 300 ETF")];
//!     let fees = Arc::new(FeeCache::load("fees.json"));
//!     let market = Arc::new(LiveMarketData::with_defaults());
//!
//!     let report = Orchestrator::new(market, fees)
//!         .run(&universe, TradingDate::today())
//!         .await?;
//!     println!("{} rows, {} failures", report.rows.len(), report.failures.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod orchestrator;

// Client seam and adapters
pub use client::{
    Backoff, BarScale, ClientPolicy, EastmoneyAdapter, HttpClient, HttpError, HttpRequest,
    HttpResponse, LiveMarketData, MarketData, NoopHttpClient, ReqwestHttpClient, RequestThrottle,
    RetryConfig, SinaAdapter,
};

// Domain models
pub use domain::{
    normalize_series, CrossSignal, FundId, FundSpec, HistogramFlip, IndicatorResult, Macd,
    MaRelation, PriceBar, TradingDate,
};

// Error types
pub use error::{BatchError, FetchError, FetchErrorKind, ValidationError};

// Orchestration
pub use orchestrator::{FundFailure, Orchestrator, RunReport, DEFAULT_WORKERS};

// Persistence (re-exported from etfsignal-store)
pub use etfsignal_store::{
    FeeCache, FeeRecord, SnapshotRecord, SnapshotStore, StoreError, StorePaths,
};
