use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format Open-Meteo uses for hourly timestamps, e.g. `2024-05-01T13:00`.
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A geocoding candidate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    /// First-level administrative area (state, prefecture, ...).
    #[serde(default)]
    pub admin1: Option<String>,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }

    /// "Name, Admin1, Country" with missing parts skipped.
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Hourly variables, aligned by index. Both keys must be present; an hour
/// without a reading comes through as `null`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HourlySeries {
    pub temperature_2m: Vec<Option<f32>>,
    pub time: Vec<String>,
}

impl HourlySeries {
    /// Timestamp paired with the last temperature, if present and parseable.
    pub fn latest_time(&self) -> Option<NaiveDateTime> {
        let idx = self.temperature_2m.len().checked_sub(1)?;
        let raw = self.time.get(idx)?;
        NaiveDateTime::parse_from_str(raw, HOURLY_TIME_FORMAT).ok()
    }
}

/// Body of `GET /v1/forecast`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub hourly: HourlySeries,
}
