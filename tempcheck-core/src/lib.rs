//! Core library for the `tempcheck` CLI.
//!
//! This crate defines:
//! - Configuration (API endpoints, geocoding language)
//! - Geocoding and forecast clients for the Open-Meteo APIs
//! - The lookup pipeline turning a place name into its latest hourly temperature
//!
//! It is used by `tempcheck-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod extract;
pub mod forecast;
pub mod geocode;
pub mod lookup;
pub mod model;

pub use config::Config;
pub use error::{FetchError, GeocodeError, LookupError};
pub use extract::latest_temperature;
pub use forecast::{ForecastSource, OpenMeteoForecast};
pub use geocode::{Geocoder, OpenMeteoGeocoder};
pub use lookup::{LookupResult, WeatherLookup};
pub use model::{Coordinates, ForecastResponse, HourlySeries, Place};
