//! Resolvers for the external data providers.
//!
//! Each resolver owns a handle to a shared [`HttpTransport`] and knows one
//! provider's URL layout and response shape.

use crate::{
    Config,
    http::{HttpTransport, ReqwestTransport},
};
use std::sync::Arc;

pub mod exchangerate;
pub mod nominatim;
pub mod openweather;
pub mod restcountries;

pub use exchangerate::ExchangeRateResolver;
pub use nominatim::NominatimGeocoder;
pub use openweather::OpenWeatherResolver;
pub use restcountries::RestCountriesResolver;

/// Every resolver the app needs, built over one transport.
#[derive(Debug, Clone)]
pub struct Providers {
    pub weather: OpenWeatherResolver,
    pub country: RestCountriesResolver,
    pub currency: ExchangeRateResolver,
    pub geocoder: NominatimGeocoder,
}

impl Providers {
    /// Construct all resolvers with a real HTTP client honouring `config.timeout_secs`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &Config, http: Arc<dyn HttpTransport>) -> Self {
        let endpoints = &config.endpoints;

        Self {
            weather: OpenWeatherResolver::new(
                config.api_key_or_empty().to_owned(),
                endpoints.weather.clone(),
                http.clone(),
            ),
            country: RestCountriesResolver::new(endpoints.country.clone(), http.clone()),
            currency: ExchangeRateResolver::new(endpoints.currency.clone(), http.clone()),
            geocoder: NominatimGeocoder::new(endpoints.geocode.clone(), http),
        }
    }
}

/// Append one percent-encoded path segment to a base URL.
pub(crate) fn join_segment(base: &str, segment: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), urlencoding::encode(segment))
}
