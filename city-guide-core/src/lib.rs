//! Core library for the `city-guide` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Resolvers over the weather, country, exchange-rate and geocoding providers
//! - The city lookup pipeline chaining those resolvers
//! - The durable favorites store
//!
//! It is used by `city-guide-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod favorites;
pub mod http;
pub mod map;
pub mod model;
pub mod pipeline;
pub mod provider;

#[cfg(test)]
mod testing;

pub use config::{Config, Endpoints};
pub use error::{CityLookupError, WeatherLookupError};
pub use favorites::FavoritesStore;
pub use map::{build_map_points, map_points_geojson};
pub use model::{CountryInfo, ExchangeRate, LookupResult, MapPoint, RateStatus, WeatherInfo};
pub use pipeline::LookupPipeline;
pub use provider::Providers;
