use crate::model::ForecastResponse;

/// Most recent hourly temperature, as returned by the API (Celsius).
///
/// `None` when the series is empty or its last hour has no reading; the
/// length of `time` is irrelevant.
pub fn latest_temperature(response: &ForecastResponse) -> Option<f64> {
    response.hourly.temperature_2m.last().copied().flatten().map(f64::from)
}
