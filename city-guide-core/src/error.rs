use thiserror::Error;

/// Stage-1 failure: the city could not be resolved to current weather.
///
/// Carries the full context chain of the underlying cause as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Weather error: {message}")]
pub struct WeatherLookupError {
    pub message: String,
}

impl WeatherLookupError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}

impl From<anyhow::Error> for WeatherLookupError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Error returned by [`crate::LookupPipeline::lookup_city`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityLookupError {
    #[error(transparent)]
    Weather(#[from] WeatherLookupError),
}
