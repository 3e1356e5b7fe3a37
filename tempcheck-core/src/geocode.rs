//! Free-text place name to coordinates, via the Open-Meteo geocoding search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    Config,
    error::{FetchError, GeocodeError, truncate_body},
    model::{Coordinates, Place},
};

const SERVICE: &str = "geocoding";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve `location` to the best-ranked candidate's coordinates.
    ///
    /// The caller is expected to reject blank input first.
    async fn resolve(&self, location: &str) -> Result<Coordinates, GeocodeError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Absent altogether when nothing matched.
    #[serde(default)]
    results: Vec<Place>,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, config: &Config) -> Self {
        Self { http, url: config.geocoding_url(), language: config.language.clone() }
    }

    /// Ask for at most `count` ranked candidates.
    pub async fn search(&self, location: &str, count: u8) -> Result<Vec<Place>, FetchError> {
        let count = count.to_string();
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("name", location),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
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

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|source| FetchError::Decode { service: SERVICE, source })?;

        Ok(parsed.results)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, location: &str) -> Result<Coordinates, GeocodeError> {
        let place = self
            .search(location, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(location.to_string()))?;

        tracing::debug!(
            query = location,
            place = %place.display_name(),
            latitude = place.latitude,
            longitude = place.longitude,
            "resolved location"
        );

        Ok(place.coordinates())
    }
}
