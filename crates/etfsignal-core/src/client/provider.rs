//! Production [`MarketData`] implementation wiring both adapters together.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::eastmoney::EastmoneyAdapter;
use super::http::{HttpClient, ReqwestHttpClient};
use super::retry::RetryConfig;
use super::sina::{BarScale, SinaAdapter};
use super::throttle::RequestThrottle;
use super::MarketData;
use crate::{FeeRecord, FetchError, FundId, PriceBar};

/// Retry and throttle settings shared by both provider hosts.
///
/// Each host gets its own throttle built from the same quota, since the
/// informal ceiling applies per host, not across them.
#[derive(Debug, Clone)]
pub struct ClientPolicy {
    pub retry: RetryConfig,
    pub quota_window: Duration,
    pub quota_limit: u32,
}

impl Default for ClientPolicy {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            quota_window: Duration::from_secs(10),
            quota_limit: 20,
        }
    }
}

/// Live provider client: kline data from Sina, fee rates from Eastmoney.
#[derive(Clone)]
pub struct LiveMarketData {
    sina: SinaAdapter,
    eastmoney: EastmoneyAdapter,
}

impl LiveMarketData {
    pub fn new(http: Arc<dyn HttpClient>, policy: ClientPolicy) -> Self {
        let sina = SinaAdapter::new(
            Arc::clone(&http),
            policy.retry.clone(),
            RequestThrottle::new(policy.quota_window, policy.quota_limit),
        );
        let eastmoney = EastmoneyAdapter::new(
            http,
            policy.retry.clone(),
            RequestThrottle::new(policy.quota_window, policy.quota_limit),
        );
        Self { sina, eastmoney }
    }

    /// Convenience constructor with the reqwest transport and default policy.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), ClientPolicy::default())
    }
}

impl MarketData for LiveMarketData {
    fn daily_bars<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.sina.bars(fund, BarScale::Daily).await })
    }

    fn weekly_bars<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.sina.bars(fund, BarScale::Weekly).await })
    }

    fn fee<'a>(
        &'a self,
        fund: &'a FundId,
    ) -> Pin<Box<dyn Future<Output = Result<FeeRecord, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.eastmoney.fee(fund).await })
    }
}
