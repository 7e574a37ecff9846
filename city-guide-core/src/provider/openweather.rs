use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::{error::WeatherLookupError, http::HttpTransport, model::WeatherInfo};

/// Current-weather lookup against the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherResolver {
    api_key: String,
    url: String,
    http: Arc<dyn HttpTransport>,
}

impl OpenWeatherResolver {
    pub fn new(api_key: String, url: String, http: Arc<dyn HttpTransport>) -> Self {
        Self { api_key, url, http }
    }

    /// Resolve `city` to its current conditions.
    ///
    /// Any transport failure, error status or missing field fails the lookup.
    pub async fn resolve(&self, city: &str) -> Result<WeatherInfo, WeatherLookupError> {
        self.fetch_current(city).await.map_err(WeatherLookupError::from)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherInfo> {
        debug!(city, "Requesting current weather from OpenWeather");

        let body = self
            .http
            .get_text(
                &self.url,
                &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
            )
            .await?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather description"))?;

        Ok(WeatherInfo {
            temperature_c: parsed.main.temp,
            description,
            country_code: parsed.sys.country,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}
