//! Market data client: the provider seam plus its transport, retry and
//! throttling plumbing.

mod eastmoney;
mod http;
mod provider;
mod retry;
mod sina;
mod throttle;

use std::future::Future;
use std::pin::Pin;

pub use eastmoney::EastmoneyAdapter;
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use provider::{ClientPolicy, LiveMarketData};
pub use retry::{with_retry, Backoff, RetryConfig};
pub use sina::{BarScale, SinaAdapter};
pub use throttle::RequestThrottle;

use crate::{FeeRecord, FetchError, FundId, PriceBar};

/// Provider contract for the pipeline.
///
/// Each call covers one fund and may fail with a per-fund [`FetchError`];
/// the orchestrator turns those into report entries, never into a batch
/// abort. Series come back chronological with duplicate dates dropped.
pub trait MarketData: Send + Sync {
    /// Daily OHLCV history, oldest first. The indicator engine wants at
    /// least 60 bars; shorter histories are still returned.
    fn daily_bars<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, FetchError>> + Send + 'a>>;

    /// Weekly OHLCV history, oldest first.
    fn weekly_bars<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, FetchError>> + Send + 'a>>;

    /// Management and custody fee rates.
    fn fee<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<FeeRecord, FetchError>> + Send + 'a>>;
}

/// Map a transport error onto the fetch taxonomy.
fn transport_error(error: HttpError) -> FetchError {
    if error.retryable() {
        FetchError::transient(error.message())
    } else {
        FetchError::invalid_response(error.message())
    }
}

/// Map a non-success HTTP status onto the fetch taxonomy.
fn status_error(provider: &str, status: u16) -> FetchError {
    match status {
        404 => FetchError::not_found(format!("{provider} returned status 404")),
        408 | 429 => FetchError::transient(format!("{provider} returned status {status}")),
        500..=599 => FetchError::transient(format!("{provider} returned status {status}")),
        other => FetchError::invalid_response(format!("{provider} returned status {other}")),
    }
}
