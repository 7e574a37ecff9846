//! Human-readable output.
//!
//! Sentinel values are rendered as-is ("Unknown", 0.00) so degraded
//! lookups stay visible to the user.

use city_guide_core::{LookupResult, MapPoint};
use std::fmt::Write;

pub fn lookup(result: &LookupResult) -> String {
    let country = if result.country.is_unknown() {
        result.country.name.clone()
    } else {
        format!("{} ({})", result.country.name, result.country.region)
    };

    let currency = result.country.currency_code.as_deref().unwrap_or("none");
    let rate = if result.has_rate() {
        format!("{currency} = {:.2} USD", result.rate_to_usd)
    } else {
        format!("{currency} = {:.2} USD ({})", result.rate_to_usd, result.rate_status)
    };

    format!(
        "📍 {}\n\
         🌡 Temp: {:.1}°C, {}\n\
         🌍 Country: {}\n\
         💵 Currency: {}",
        result.city, result.weather.temperature_c, result.weather.description, country, rate,
    )
}

pub fn favorites(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No favorites yet".to_string();
    }

    let mut out = String::from("⭐ Favorites:");
    for city in cities {
        let _ = write!(out, "\n{city}");
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
    Failed,
}

pub fn save_outcome(city: &str, outcome: SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved => format!("✅ Saved {city}!"),
        SaveOutcome::AlreadySaved => format!("{city} already saved"),
        SaveOutcome::Failed => format!("Could not save {city} to favorites"),
    }
}

pub fn map_points(points: &[MapPoint], requested: usize) -> String {
    let mut out = format!("🗺 {} of {} favorites located:", points.len(), requested);
    for p in points {
        let _ = write!(out, "\n{:<20} {:>9.4} {:>10.4}", p.city, p.latitude, p.longitude);
    }
    out
}
