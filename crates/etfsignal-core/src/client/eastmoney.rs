//! Eastmoney fee adapter.
//!
//! There is no structured endpoint for fund fee rates; they are lifted off
//! the fund-profile HTML page (`jbgk_<code>.html`) with anchored regexes,
//! exactly the two cells the page has carried for years. A page without both
//! rates is treated as an unknown fund.

use std::sync::Arc;

use regex::Regex;

use super::http::{HttpClient, HttpRequest};
use super::retry::{with_retry, RetryConfig};
use super::throttle::RequestThrottle;
use super::{status_error, transport_error};
use crate::{FeeRecord, FetchError, FundId};

const PROFILE_BASE: &str = "http://fundf10.eastmoney.com";

/// Fee-rate fetcher with retry and throttling baked in.
#[derive(Clone)]
pub struct EastmoneyAdapter {
    http: Arc<dyn HttpClient>,
    retry: RetryConfig,
    throttle: RequestThrottle,
    management_re: Arc<Regex>,
    custody_re: Arc<Regex>,
}

impl EastmoneyAdapter {
    pub fn new(http: Arc<dyn HttpClient>, retry: RetryConfig, throttle: RequestThrottle) -> Self {
        Self {
            http,
            retry,
            throttle,
            management_re: Arc::new(
                Regex::new(r"管理费率[^0-9]*?([0-9]+(?:\.[0-9]+)?)%").expect("static pattern"),
            ),
            custody_re: Arc::new(
                Regex::new(r"托管费率[^0-9]*?([0-9]+(?:\.[0-9]+)?)%").expect("static pattern"),
            ),
        }
    }

    pub async fn fee(&self, fund: &FundId) -> Result<FeeRecord, FetchError> {
        let url = format!("{PROFILE_BASE}/jbgk_{}.html", fund.as_str());
        let url = url.as_str();

        with_retry(&self.retry, || async move {
            self.throttle.acquire().await;
            let request = HttpRequest::get(url);
            let response = self.http.execute(request).await.map_err(transport_error)?;
            if !response.is_success() {
                return Err(status_error("eastmoney", response.status));
            }
            self.parse_profile(fund, &response.body)
        })
        .await
    }

    fn parse_profile(&self, fund: &FundId, body: &str) -> Result<FeeRecord, FetchError> {
        let management = extract_rate(&self.management_re, body);
        let custody = extract_rate(&self.custody_re, body);

        match (management, custody) {
            (Some(management_rate), Some(custody_rate)) => Ok(FeeRecord {
                management_rate,
                custody_rate,
            }),
            (None, None) => Err(FetchError::not_found(format!(
                "eastmoney profile page carries no fee rates for fund {fund}"
            ))),
            _ => Err(FetchError::invalid_response(format!(
                "eastmoney profile page for fund {fund} is missing one of the fee rates"
            ))),
        }
    }
}

fn extract_rate(pattern: &Regex, body: &str) -> Option<f64> {
    let captured = pattern.captures(body)?.get(1)?.as_str();
    let rate: f64 = captured.parse().ok()?;
    // Fee rates are annual percentages; anything negative or absurd means we
    // matched the wrong cell.
    (rate.is_finite() && (0.0..=10.0).contains(&rate)).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchErrorKind;

    fn adapter() -> EastmoneyAdapter {
        EastmoneyAdapter::new(
            Arc::new(super::super::http::NoopHttpClient),
            RetryConfig::no_retry(),
            RequestThrottle::new(std::time::Duration::from_secs(1), 100),
        )
    }

    fn fund() -> FundId {
        FundId::parse("510300").expect("code")
    }

    #[test]
    fn extracts_both_rates_from_profile_table() {
        let body = concat!(
            "<table><tr><th>管理费率</th><td>0.50%（每年）</td>",
            "<th>托管费率</th><td>0.10%（每年）</td></tr></table>"
        );
        let fee = adapter().parse_profile(&fund(), body).expect("parse");
        assert_eq!(fee.management_rate, 0.5);
        assert_eq!(fee.custody_rate, 0.1);
    }

    #[test]
    fn page_without_rates_is_not_found() {
        let error = adapter()
            .parse_profile(&fund(), "<html>没有找到该基金</html>")
            .expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::NotFound);
    }

    #[test]
    fn page_with_one_rate_is_invalid_response() {
        let body = "<th>管理费率</th><td>0.50%</td>";
        let error = adapter().parse_profile(&fund(), body).expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::InvalidResponse);
    }

    #[test]
    fn absurd_rate_does_not_match() {
        let body = "<th>管理费率</th><td>2024%</td><th>托管费率</th><td>0.10%</td>";
        let error = adapter().parse_profile(&fund(), body).expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::InvalidResponse);
    }
}
