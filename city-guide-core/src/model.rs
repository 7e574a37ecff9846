use serde::{Deserialize, Serialize};

/// Current conditions for a city, as reported by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub temperature_c: f64,
    pub description: String,
    /// ISO 3166-1 alpha-2 code, exactly as the provider returned it.
    pub country_code: String,
}

/// Country directory data. `CountryInfo::unknown()` is the fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    pub currency_code: Option<String>,
    pub region: String,
}

pub const UNKNOWN: &str = "Unknown";

impl CountryInfo {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            currency_code: None,
            region: UNKNOWN.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateStatus {
    Ok,
    NoCurrency,
    Unavailable,
}

impl RateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RateStatus::Ok => "Current rate",
            RateStatus::NoCurrency => "No currency",
            RateStatus::Unavailable => "Rate unavailable",
        }
    }
}

impl std::fmt::Display for RateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// USD exchange rate for a currency.
///
/// `rate_to_usd` is only meaningful when `status` is [`RateStatus::Ok`];
/// every other status carries the `0.0` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate_to_usd: f64,
    pub status: RateStatus,
}

impl ExchangeRate {
    pub fn ok(rate_to_usd: f64) -> Self {
        Self { rate_to_usd, status: RateStatus::Ok }
    }

    pub fn no_currency() -> Self {
        Self { rate_to_usd: 0.0, status: RateStatus::NoCurrency }
    }

    pub fn unavailable() -> Self {
        Self { rate_to_usd: 0.0, status: RateStatus::Unavailable }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub city: String,
    pub weather: WeatherInfo,
    pub country: CountryInfo,
    pub rate_to_usd: f64,
    pub rate_status: RateStatus,
}

impl LookupResult {
    pub fn has_rate(&self) -> bool {
        self.rate_status == RateStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}
