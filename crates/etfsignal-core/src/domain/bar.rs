use serde::{Deserialize, Serialize};

use crate::{TradingDate, ValidationError};

/// OHLCV bar for one trading session at daily or weekly granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Normalize a provider series: chronological order, duplicate dates dropped
/// (first occurrence wins). The indicator engine assumes this shape.
pub fn normalize_series(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    bars
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> TradingDate {
        TradingDate::parse(input).expect("test date")
    }

    #[test]
    fn rejects_inverted_range() {
        let err = PriceBar::new(date("2025-06-02"), 1.0, 0.9, 1.1, 1.0, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_close_outside_bounds() {
        let err = PriceBar::new(date("2025-06-02"), 1.0, 1.2, 0.9, 1.25, Some(10))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn normalize_sorts_and_drops_duplicate_dates() {
        let bar = |day: &str, close: f64| {
            PriceBar::new(date(day), close, close, close, close, None).expect("bar")
        };
        let series = normalize_series(vec![
            bar("2025-06-03", 2.0),
            bar("2025-06-02", 1.0),
            bar("2025-06-03", 3.0),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].close, 1.0);
        assert_eq!(series[1].close, 2.0);
    }
}
