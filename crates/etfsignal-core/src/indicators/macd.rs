//! Weekly MACD(12, 26, 9).
//!
//! EMA recursion: `EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]` with
//! `alpha = 2 / (period + 1)`, seeded at index `period - 1` with the simple
//! average of the first `period` values. The DIF series therefore starts at
//! index 25, and DEA (the 9-period EMA of DIF, seeded the same way) needs at
//! least 34 weekly closes before the full triple exists.

use crate::{HistogramFlip, Macd, PriceBar};

/// Fast EMA period.
pub const MACD_FAST: usize = 12;
/// Slow EMA period.
pub const MACD_SLOW: usize = 26;
/// Signal (DEA) EMA period.
pub const MACD_SIGNAL: usize = 9;
/// Minimum weekly closes before DIF, DEA and the histogram all exist.
pub const MACD_MIN_BARS: usize = MACD_SLOW + MACD_SIGNAL - 1;

/// MACD summary for the latest weekly bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdSummary {
    pub value: Option<Macd>,
    pub flip: Option<HistogramFlip>,
}

impl MacdSummary {
    pub const fn unavailable() -> Self {
        Self {
            value: None,
            flip: None,
        }
    }
}

/// Recursive EMA over a raw series; indices below `period - 1` are NaN.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut previous = seed;
    for index in period..n {
        let ema = alpha * values[index] + (1.0 - alpha) * previous;
        result[index] = ema;
        previous = ema;
    }

    result
}

/// Evaluate the weekly MACD triple over a chronological weekly series.
pub fn macd_summary(weekly: &[PriceBar]) -> MacdSummary {
    let closes: Vec<f64> = weekly.iter().map(|bar| bar.close).collect();
    if closes.len() < MACD_MIN_BARS {
        return MacdSummary::unavailable();
    }

    let ema_fast = ema_series(&closes, MACD_FAST);
    let ema_slow = ema_series(&closes, MACD_SLOW);

    // Both EMAs exist from the slow seed onwards.
    let dif: Vec<f64> = (MACD_SLOW - 1..closes.len())
        .map(|index| ema_fast[index] - ema_slow[index])
        .collect();
    let dea = ema_series(&dif, MACD_SIGNAL);

    let last = dif.len() - 1;
    let latest = Macd {
        dif: dif[last],
        dea: dea[last],
        histogram: 2.0 * (dif[last] - dea[last]),
    };

    // The flip needs a DEA on the previous bar too.
    let flip = if dif.len() > MACD_SIGNAL {
        let previous_histogram = 2.0 * (dif[last - 1] - dea[last - 1]);
        detect_flip(previous_histogram, latest.histogram)
    } else {
        None
    };

    MacdSummary {
        value: Some(latest),
        flip,
    }
}

fn detect_flip(previous: f64, current: f64) -> Option<HistogramFlip> {
    if previous > 0.0 && current <= 0.0 {
        Some(HistogramFlip::TurnedNegative)
    } else if previous <= 0.0 && current > 0.0 {
        Some(HistogramFlip::TurnedPositive)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDate;

    fn weekly_bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = TradingDate::parse("2020-01-03").expect("date").into_inner();
        closes
            .iter()
            .enumerate()
            .map(|(offset, &close)| {
                let date = TradingDate::from(
                    time::Date::from_julian_day(start.to_julian_day() + 7 * offset as i32)
                        .expect("date in range"),
                );
                PriceBar::new(date, close, close, close, close, None).expect("bar")
            })
            .collect()
    }

    #[test]
    fn ema_seeds_with_simple_average() {
        // Closes: 10, 11, 12, 13, 14; alpha = 2/(3+1) = 0.5.
        // Seed at index 2: (10 + 11 + 12) / 3 = 11.0.
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0; EMA[4] = 0.5*14 + 0.5*12.0 = 13.0.
        let series = ema_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        assert_eq!(series[2], 11.0);
        assert_eq!(series[3], 12.0);
        assert_eq!(series[4], 13.0);
    }

    #[test]
    fn ema12_seed_matches_reference_fixture() {
        let closes: Vec<f64> = (10..=26).map(f64::from).collect();
        let series = ema_series(&closes, 12);
        assert_eq!(series[11], 11.5);
    }

    #[test]
    fn ema_shorter_than_period_is_all_nan() {
        let series = ema_series(&[1.0, 2.0], 3);
        assert!(series.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn short_weekly_series_is_unavailable() {
        for len in [0, 10, MACD_SLOW - 1, MACD_SLOW, MACD_MIN_BARS - 1] {
            let closes: Vec<f64> = (0..len).map(|step| 10.0 + step as f64).collect();
            let summary = macd_summary(&weekly_bars(&closes));
            assert_eq!(summary, MacdSummary::unavailable(), "len={len}");
        }
    }

    #[test]
    fn rising_series_has_positive_dif_and_histogram() {
        let closes: Vec<f64> = (0..52).map(|step| 10.0 + step as f64 * 0.5).collect();
        let summary = macd_summary(&weekly_bars(&closes));
        let macd = summary.value.expect("macd available");
        assert!(macd.dif > 0.0);
        assert!(macd.histogram.is_finite());
        assert_eq!(macd.histogram, 2.0 * (macd.dif - macd.dea));
    }

    #[test]
    fn macd_is_deterministic_to_the_bit() {
        let closes: Vec<f64> = (0..60)
            .map(|step| 10.0 + (step as f64 * 0.7).sin())
            .collect();
        let bars = weekly_bars(&closes);
        let first = macd_summary(&bars);
        let second = macd_summary(&bars);
        assert_eq!(first, second);
        let first = first.value.expect("available");
        let second = second.value.expect("available");
        assert_eq!(first.dif.to_bits(), second.dif.to_bits());
        assert_eq!(first.dea.to_bits(), second.dea.to_bits());
        assert_eq!(first.histogram.to_bits(), second.histogram.to_bits());
    }

    #[test]
    fn trend_reversal_flips_the_histogram() {
        // Long decline keeps the histogram negative, then a sharp rally
        // drives it through zero.
        let mut closes: Vec<f64> = (0..60).map(|step| 100.0 - step as f64).collect();
        for step in 0..14 {
            closes.push(41.0 + step as f64 * 6.0);
        }
        let bars = weekly_bars(&closes);

        let mut flipped_at = None;
        for len in MACD_MIN_BARS..=bars.len() {
            let summary = macd_summary(&bars[..len]);
            if summary.flip == Some(HistogramFlip::TurnedPositive) {
                flipped_at = Some(len);
                break;
            }
        }

        let len = flipped_at.expect("rally must flip the histogram positive");
        let before = macd_summary(&bars[..len - 1]).value.expect("available");
        let after = macd_summary(&bars[..len]).value.expect("available");
        assert!(before.histogram <= 0.0);
        assert!(after.histogram > 0.0);
    }
}
