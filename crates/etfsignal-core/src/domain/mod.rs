//! Canonical domain types for the pipeline.
//!
//! Everything crossing the provider boundary is validated into these types
//! immediately; the rest of the pipeline never touches raw wire data.

mod bar;
mod date;
mod fund;
mod indicator;

pub use bar::{normalize_series, PriceBar};
pub use date::TradingDate;
pub use fund::{FundId, FundSpec};
pub use indicator::{CrossSignal, HistogramFlip, IndicatorResult, Macd, MaRelation};
