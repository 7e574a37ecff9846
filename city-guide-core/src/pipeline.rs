//! The three-stage city lookup: weather, then country, then currency.

use tracing::debug;

use crate::{
    Config,
    error::{CityLookupError, WeatherLookupError},
    model::LookupResult,
    provider::{ExchangeRateResolver, OpenWeatherResolver, Providers, RestCountriesResolver},
};

/// Runs the chained lookup for one city.
///
/// Stages run strictly in order, each fed only by the previous stage's
/// output. Only the weather stage can abort; the other two degrade to
/// sentinels. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct LookupPipeline {
    weather: OpenWeatherResolver,
    country: RestCountriesResolver,
    currency: ExchangeRateResolver,
}

impl LookupPipeline {
    pub fn new(
        weather: OpenWeatherResolver,
        country: RestCountriesResolver,
        currency: ExchangeRateResolver,
    ) -> Self {
        Self { weather, country, currency }
    }

    pub fn from_providers(providers: &Providers) -> Self {
        Self::new(
            providers.weather.clone(),
            providers.country.clone(),
            providers.currency.clone(),
        )
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::from_providers(&Providers::from_config(config)?))
    }

    pub async fn lookup_city(&self, city: &str) -> Result<LookupResult, CityLookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherLookupError::new("city name must not be empty").into());
        }

        debug!(city, "Stage 1: weather");
        let weather = self.weather.resolve(city).await?;

        debug!(city, country_code = %weather.country_code, "Stage 2: country");
        let country = self.country.resolve(&weather.country_code).await;

        debug!(city, currency_code = ?country.currency_code, "Stage 3: exchange rate");
        let rate = self.currency.resolve(country.currency_code.as_deref()).await;

        Ok(LookupResult {
            city: city.to_string(),
            weather,
            country,
            rate_to_usd: rate.rate_to_usd,
            rate_status: rate.status,
        })
    }
}
