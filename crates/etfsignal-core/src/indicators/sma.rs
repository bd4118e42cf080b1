//! 60-day moving-average relationship.
//!
//! Rolling mean of daily closes; the latest close is compared against it with
//! exact f64 equality (`Equal` only on an exact tie). Fewer than 60 bars
//! means `Unavailable`, fewer than 61 means no cross detection.

use crate::{CrossSignal, MaRelation, PriceBar};

/// Window of the daily moving average.
pub const MA_WINDOW: usize = 60;

/// Moving-average summary for the latest session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaSummary {
    pub latest_close: Option<f64>,
    pub ma60: Option<f64>,
    pub relation: MaRelation,
    pub cross: Option<CrossSignal>,
}

/// Mean of the trailing `window` values, `None` when the series is shorter.
pub fn sma_last(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let sum: f64 = values[values.len() - window..].iter().sum();
    Some(sum / window as f64)
}

/// Evaluate the MA60 relationship over a chronological daily series.
pub fn ma_summary(daily: &[PriceBar]) -> MaSummary {
    let closes: Vec<f64> = daily.iter().map(|bar| bar.close).collect();
    let latest_close = closes.last().copied();
    let ma60 = sma_last(&closes, MA_WINDOW);

    let relation = match (latest_close, ma60) {
        (Some(close), Some(average)) => compare(close, average),
        _ => MaRelation::Unavailable,
    };

    MaSummary {
        latest_close,
        ma60,
        relation,
        cross: detect_cross(&closes),
    }
}

fn compare(close: f64, average: f64) -> MaRelation {
    if close > average {
        MaRelation::Above
    } else if close < average {
        MaRelation::Below
    } else {
        MaRelation::Equal
    }
}

/// Cross detection needs the relation on the previous session too, so at
/// least `MA_WINDOW + 1` closes.
fn detect_cross(closes: &[f64]) -> Option<CrossSignal> {
    if closes.len() < MA_WINDOW + 1 {
        return None;
    }

    let current_average = sma_last(closes, MA_WINDOW)?;
    let previous_average = sma_last(&closes[..closes.len() - 1], MA_WINDOW)?;
    let current_close = closes[closes.len() - 1];
    let previous_close = closes[closes.len() - 2];

    let was_above = previous_close >= previous_average;
    let is_above = current_close >= current_average;
    match (was_above, is_above) {
        (false, true) => Some(CrossSignal::CrossUp),
        (true, false) => Some(CrossSignal::CrossDown),
        _ => None,
    }
}
