//! Hourly forecast for a pair of coordinates, via the Open-Meteo forecast API.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    Config,
    error::{FetchError, truncate_body},
    model::{Coordinates, ForecastResponse},
};

const SERVICE: &str = "forecast";

/// Hourly variable selector; only 2 m air temperature is requested.
pub const HOURLY_VARIABLE: &str = "temperature_2m";

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, at: Coordinates) -> Result<ForecastResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, config: &Config) -> Self {
        Self { http, url: config.forecast_url() }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn fetch_forecast(&self, at: Coordinates) -> Result<ForecastResponse, FetchError> {
        tracing::debug!(url = %self.url, %at, "requesting hourly forecast");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("hourly", HOURLY_VARIABLE.to_string()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Transport { service: SERVICE, source })?;

        let status = res.status();
        let body =
            res.text().await.map_err(|source| FetchError::Transport { service: SERVICE, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { service: SERVICE, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { service: SERVICE, source })
    }
}
