//! Sina kline adapter.
//!
//! One GET per fund and granularity against the `getKLineData` endpoint,
//! which answers with a JSON array of string-encoded OHLCV rows. Rows are
//! validated into [`PriceBar`] at this boundary; an empty array for a
//! well-formed code means the provider does not track it.

use std::sync::Arc;

use serde::Deserialize;

use super::http::{HttpClient, HttpRequest};
use super::retry::{with_retry, RetryConfig};
use super::throttle::RequestThrottle;
use super::{status_error, transport_error};
use crate::{normalize_series, FetchError, FundId, PriceBar, TradingDate};

const KLINE_ENDPOINT: &str =
    "https://quotes.sina.cn/cn/api/json_v2.php/CN_MarketDataService.getKLineData";
const REFERER: &str = "https://finance.sina.com.cn/";

/// Bar granularity in the provider's `scale` units (minutes per bar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarScale {
    Daily,
    Weekly,
}

impl BarScale {
    const fn scale(self) -> u32 {
        match self {
            Self::Daily => 240,
            Self::Weekly => 1680,
        }
    }

    /// How much history to ask for: roughly four years of daily bars, ten
    /// years of weekly ones.
    const fn datalen(self) -> u32 {
        match self {
            Self::Daily => 1023,
            Self::Weekly => 512,
        }
    }
}

/// Kline fetcher with retry and throttling baked in.
#[derive(Clone)]
pub struct SinaAdapter {
    http: Arc<dyn HttpClient>,
    retry: RetryConfig,
    throttle: RequestThrottle,
}

impl SinaAdapter {
    pub fn new(http: Arc<dyn HttpClient>, retry: RetryConfig, throttle: RequestThrottle) -> Self {
        Self {
            http,
            retry,
            throttle,
        }
    }

    pub async fn bars(&self, fund: &FundId, scale: BarScale) -> Result<Vec<PriceBar>, FetchError> {
        let url = format!(
            "{KLINE_ENDPOINT}?symbol={}&scale={}&ma=no&datalen={}",
            urlencoding::encode(&fund.provider_symbol()),
            scale.scale(),
            scale.datalen(),
        );
        let url = url.as_str();

        with_retry(&self.retry, || async move {
            self.throttle.acquire().await;
            let request = HttpRequest::get(url).with_header("referer", REFERER);
            let response = self.http.execute(request).await.map_err(transport_error)?;
            if !response.is_success() {
                return Err(status_error("sina", response.status));
            }
            parse_kline(fund, &response.body)
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
struct RawKline {
    day: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

/// Parse the provider's kline payload into a normalized series.
fn parse_kline(fund: &FundId, body: &str) -> Result<Vec<PriceBar>, FetchError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(FetchError::not_found(format!(
            "sina has no kline data for fund {fund}"
        )));
    }

    let rows: Vec<RawKline> = serde_json::from_str(trimmed).map_err(|error| {
        FetchError::invalid_response(format!("sina kline payload is not valid JSON: {error}"))
    })?;

    if rows.is_empty() {
        return Err(FetchError::not_found(format!(
            "sina has no kline data for fund {fund}"
        )));
    }

    let mut bars = Vec::with_capacity(rows.len());
    for row in rows {
        let date = TradingDate::parse(&row.day).map_err(|error| {
            FetchError::invalid_response(format!("sina kline date '{}': {error}", row.day))
        })?;
        let open = parse_price("open", &row.open)?;
        let high = parse_price("high", &row.high)?;
        let low = parse_price("low", &row.low)?;
        let close = parse_price("close", &row.close)?;
        let volume = match row.volume.as_deref() {
            Some(raw) => Some(parse_volume(raw)?),
            None => None,
        };

        // The provider occasionally emits a bar whose open/close sit a tick
        // outside the high/low band; skip those rather than fail the fund.
        if let Ok(bar) = PriceBar::new(date, open, high, low, close, volume) {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(FetchError::invalid_response(format!(
            "sina kline payload for fund {fund} contained no usable bars"
        )));
    }

    Ok(normalize_series(bars))
}

fn parse_price(field: &'static str, raw: &str) -> Result<f64, FetchError> {
    raw.trim().parse::<f64>().map_err(|_| {
        FetchError::invalid_response(format!("sina kline field '{field}' is not numeric: '{raw}'"))
    })
}

fn parse_volume(raw: &str) -> Result<u64, FetchError> {
    let value = raw.trim().parse::<f64>().map_err(|_| {
        FetchError::invalid_response(format!("sina kline volume is not numeric: '{raw}'"))
    })?;
    Ok(value.max(0.0) as u64)
}
