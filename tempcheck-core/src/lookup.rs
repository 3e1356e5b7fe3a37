//! The lookup pipeline: location text → coordinates → forecast → latest temperature.

use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    Config,
    error::LookupError,
    extract::latest_temperature,
    forecast::{ForecastSource, OpenMeteoForecast},
    geocode::{Geocoder, OpenMeteoGeocoder},
};

/// Temperature in °C on success.
pub type LookupResult = std::result::Result<f64, LookupError>;

const USER_AGENT: &str = concat!("tempcheck/", env!("CARGO_PKG_VERSION"));

/// Stateless; share it behind an `Arc` to run lookups concurrently.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
}

impl WeatherLookup {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastSource>) -> Self {
        Self { geocoder, forecast }
    }

    /// Build the Open-Meteo backed pipeline. Both clients share one connection pool.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::new(
            Arc::new(OpenMeteoGeocoder::new(http.clone(), config)),
            Arc::new(OpenMeteoForecast::new(http, config)),
        ))
    }

    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, location: &str) -> LookupResult {
        let coordinates = self.geocoder.resolve(location).await.map_err(|e| {
            let err = LookupError::from(e);
            tracing::warn!(error = %err, "geocoding failed");
            err
        })?;

        tracing::debug!(%coordinates, "fetching temperature");

        let forecast = self.forecast.fetch_forecast(coordinates).await.map_err(|e| {
            let err = LookupError::from(e);
            tracing::warn!(error = %err, "forecast request failed");
            err
        })?;

        let temperature = latest_temperature(&forecast).ok_or_else(|| {
            tracing::warn!(%coordinates, "forecast contained no hourly temperatures");
            LookupError::NoData
        })?;

        tracing::debug!(
            temperature,
            at = ?forecast.hourly.latest_time(),
            "latest hourly temperature"
        );

        Ok(temperature)
    }
}
