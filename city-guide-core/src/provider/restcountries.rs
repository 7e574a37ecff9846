use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use super::join_segment;
use crate::{http::HttpTransport, model::CountryInfo};

/// Country directory lookup against REST Countries.
///
/// Never fails: any problem yields [`CountryInfo::unknown`].
#[derive(Debug, Clone)]
pub struct RestCountriesResolver {
    url: String,
    http: Arc<dyn HttpTransport>,
}

impl RestCountriesResolver {
    pub fn new(url: String, http: Arc<dyn HttpTransport>) -> Self {
        Self { url, http }
    }

    pub async fn resolve(&self, country_code: &str) -> CountryInfo {
        match self.fetch(country_code).await {
            Ok(info) => info,
            Err(err) => {
                warn!(country_code, error = %format!("{err:#}"), "Country lookup failed, using fallback");
                CountryInfo::unknown()
            }
        }
    }

    async fn fetch(&self, country_code: &str) -> Result<CountryInfo> {
        debug!(country_code, "Requesting country from REST Countries");

        let url = join_segment(&self.url, country_code);
        let body = self.http.get_text(&url, &[]).await?;

        let parsed: Vec<RcCountry> =
            serde_json::from_str(&body).context("Failed to parse REST Countries JSON")?;

        let country = parsed
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("REST Countries returned no entry for '{country_code}'"))?;

        // Key order is the provider's; the first currency listed wins.
        let currency_code = country
            .currencies
            .and_then(|currencies| currencies.keys().next().cloned());

        Ok(CountryInfo {
            name: country.name.common,
            currency_code,
            region: country.region,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    name: RcName,
    #[serde(default)]
    currencies: Option<Map<String, Value>>,
    region: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    const URL: &str = "http://countries.test/v3.1/alpha";

    fn resolver(fake: &Arc<FakeTransport>) -> RestCountriesResolver {
        RestCountriesResolver::new(URL.into(), fake.clone())
    }

    #[tokio::test]
    async fn extracts_name_currency_and_region() {
        let fake = FakeTransport::new();
        fake.respond(
            URL,
            r#"[{"name":{"common":"United Kingdom"},"currencies":{"GBP":{}},"region":"Europe"}]"#,
        );

        let info = resolver(&fake).resolve("GB").await;

        assert_eq!(info.name, "United Kingdom");
        assert_eq!(info.currency_code.as_deref(), Some("GBP"));
        assert_eq!(info.region, "Europe");
        assert_eq!(fake.calls(), vec![format!("{URL}/GB")]);
    }

    #[tokio::test]
    async fn first_currency_follows_provider_order() {
        let fake = FakeTransport::new();
        fake.respond(
            URL,
            r#"[{"name":{"common":"Zimbabwe"},
                 "currencies":{"ZWL":{"name":"Zimbabwean dollar"},"BWP":{},"USD":{}},
                 "region":"Africa"}]"#,
        );

        let info = resolver(&fake).resolve("ZW").await;
        assert_eq!(info.currency_code.as_deref(), Some("ZWL"));
    }

    #[tokio::test]
    async fn missing_currencies_is_not_an_error() {
        let fake = FakeTransport::new();
        fake.respond(URL, r#"[{"name":{"common":"Antarctica"},"region":"Antarctic"}]"#);

        let info = resolver(&fake).resolve("AQ").await;

        assert_eq!(info.name, "Antarctica");
        assert_eq!(info.currency_code, None);
        assert_eq!(info.region, "Antarctic");
    }

    #[tokio::test]
    async fn empty_currency_map_yields_none() {
        let fake = FakeTransport::new();
        fake.respond(URL, r#"[{"name":{"common":"Nowhere"},"currencies":{},"region":"Oceania"}]"#);

        let info = resolver(&fake).resolve("NW").await;
        assert_eq!(info.currency_code, None);
    }

    #[tokio::test]
    async fn transport_failure_falls_back_to_unknown() {
        let fake = FakeTransport::new();
        fake.fail(URL, "timed out");

        assert_eq!(resolver(&fake).resolve("XX").await, CountryInfo::unknown());
    }

    #[tokio::test]
    async fn malformed_body_falls_back_to_unknown() {
        let fake = FakeTransport::new();
        fake.respond(URL, r#"[{"name":{"common":"No Region"}}]"#);
        assert!(resolver(&fake).resolve("NR").await.is_unknown());

        let fake = FakeTransport::new();
        fake.respond(URL, "[]");
        assert!(resolver(&fake).resolve("NR").await.is_unknown());
    }
}
