//! Map points for saved favorites.

use serde_json::{Value, json};
use tracing::warn;

use crate::{model::MapPoint, provider::NominatimGeocoder};

/// Geocode each city in order, skipping the ones that fail or have no match.
pub async fn build_map_points<S: AsRef<str>>(
    geocoder: &NominatimGeocoder,
    cities: &[S],
) -> Vec<MapPoint> {
    let mut points = Vec::with_capacity(cities.len());

    for city in cities {
        let city = city.as_ref();
        match geocoder.geocode(city).await {
            Ok(Some((latitude, longitude))) => points.push(MapPoint {
                city: city.to_string(),
                latitude,
                longitude,
            }),
            Ok(None) => warn!(city, "No coordinates found, skipping"),
            Err(err) => warn!(city, error = %format!("{err:#}"), "Geocoding failed, skipping"),
        }
    }

    points
}

/// GeoJSON `FeatureCollection` with one point feature per city.
pub fn map_points_geojson(points: &[MapPoint]) -> Value {
    let features: Vec<Value> = points
        .iter()
        .map(|p| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [p.longitude, p.latitude],
                },
                "properties": { "name": p.city },
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}
