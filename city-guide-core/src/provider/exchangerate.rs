use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::join_segment;
use crate::{http::HttpTransport, model::ExchangeRate};

/// USD rate lookup against exchangerate-api.com.
///
/// Never fails: problems are reported through [`ExchangeRate::status`].
#[derive(Debug, Clone)]
pub struct ExchangeRateResolver {
    url: String,
    http: Arc<dyn HttpTransport>,
}

impl ExchangeRateResolver {
    pub fn new(url: String, http: Arc<dyn HttpTransport>) -> Self {
        Self { url, http }
    }

    /// Resolve the USD rate of `currency_code`.
    ///
    /// A missing or blank code returns `NoCurrency` without touching the network.
    pub async fn resolve(&self, currency_code: Option<&str>) -> ExchangeRate {
        let Some(code) = currency_code.filter(|c| !c.trim().is_empty()) else {
            debug!("No currency code, skipping exchange rate lookup");
            return ExchangeRate::no_currency();
        };

        match self.fetch_usd(code).await {
            Ok(rate) => ExchangeRate::ok(rate),
            Err(err) => {
                warn!(currency_code = code, error = %format!("{err:#}"), "Exchange rate lookup failed");
                ExchangeRate::unavailable()
            }
        }
    }

    async fn fetch_usd(&self, code: &str) -> Result<f64> {
        debug!(currency_code = code, "Requesting exchange rates");

        let url = join_segment(&self.url, code);
        let body = self.http.get_text(&url, &[]).await?;

        let parsed: ErLatest =
            serde_json::from_str(&body).context("Failed to parse exchange rate JSON")?;

        let usd = parsed
            .rates
            .usd
            .ok_or_else(|| anyhow!("Exchange rate response has no USD rate for {code}"))?;

        if !usd.is_finite() || usd <= 0.0 {
            bail!("Exchange rate response has a non-positive USD rate for {code}: {usd}");
        }

        Ok(usd)
    }
}

// Only the USD entry is read; other rates may be anything.
#[derive(Debug, Deserialize)]
struct ErRates {
    #[serde(rename = "USD", default)]
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErLatest {
    rates: ErRates,
}
