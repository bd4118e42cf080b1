//! Indicator engine: pure computation, no I/O, deterministic for identical
//! input series.

mod macd;
mod sma;

pub use macd::{
    ema_series, macd_summary, MacdSummary, MACD_FAST, MACD_MIN_BARS, MACD_SIGNAL, MACD_SLOW,
};
pub use sma::{ma_summary, sma_last, MaSummary, MA_WINDOW};

use crate::{IndicatorResult, PriceBar};

/// Derive the full indicator set for one fund from its (chronological) daily
/// and weekly series.
pub fn evaluate(daily: &[PriceBar], weekly: &[PriceBar]) -> IndicatorResult {
    let ma = ma_summary(daily);
    let macd = macd_summary(weekly);

    IndicatorResult {
        latest_close: ma.latest_close,
        ma60: ma.ma60,
        ma_relation: ma.relation,
        ma_cross: ma.cross,
        macd: macd.value,
        macd_flip: macd.flip,
    }
}
