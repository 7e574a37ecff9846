use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::http::HttpTransport;

/// Forward geocoding against OpenStreetMap Nominatim.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    url: String,
    http: Arc<dyn HttpTransport>,
}

impl NominatimGeocoder {
    pub fn new(url: String, http: Arc<dyn HttpTransport>) -> Self {
        Self { url, http }
    }

    /// Latitude and longitude of the best match, or `None` when nothing matched.
    pub async fn geocode(&self, city: &str) -> Result<Option<(f64, f64)>> {
        debug!(city, "Geocoding");

        let body = self
            .http
            .get_text(&self.url, &[("q", city), ("format", "json"), ("limit", "1")])
            .await?;

        let places: Vec<NmPlace> =
            serde_json::from_str(&body).context("Failed to parse Nominatim JSON")?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let lat = place
            .lat
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude from Nominatim: {}", place.lat))?;
        let lon = place
            .lon
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude from Nominatim: {}", place.lon))?;

        Ok(Some((lat, lon)))
    }
}

// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    const URL: &str = "http://geo.test/search";

    #[tokio::test]
    async fn returns_first_match() {
        let fake = FakeTransport::new();
        fake.respond(
            URL,
            r#"[{"lat":"48.8588897","lon":"2.3200410","display_name":"Paris"},{"lat":"33.66","lon":"-95.55"}]"#,
        );

        let geocoder = NominatimGeocoder::new(URL.into(), fake.clone());
        let coords = geocoder.geocode("Paris").await.unwrap();

        assert_eq!(coords, Some((48.8588897, 2.3200410)));
        assert_eq!(fake.calls(), vec![format!("{URL}?q=Paris&format=json&limit=1")]);
    }

    #[tokio::test]
    async fn no_match_is_none() {
        let fake = FakeTransport::new();
        fake.respond(URL, "[]");

        let geocoder = NominatimGeocoder::new(URL.into(), fake);
        assert_eq!(geocoder.geocode("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn provider_errors_surface() {
        let fake = FakeTransport::new();
        fake.fail(URL, "status 503");
        let geocoder = NominatimGeocoder::new(URL.into(), fake);
        assert!(geocoder.geocode("Paris").await.is_err());

        let fake = FakeTransport::new();
        fake.respond(URL, r#"[{"lat":"north","lon":"2.0"}]"#);
        let geocoder = NominatimGeocoder::new(URL.into(), fake);
        assert!(geocoder.geocode("Paris").await.is_err());
    }
}
