//! Human-readable output for lookup results.

use anyhow::{Result, anyhow};
use tempcheck_core::LookupResult;

pub const BLANK_LOCATION: &str = "Please enter a location";

/// `19.8` → `"19.80 °C"`.
pub fn celsius(value: f64) -> String {
    format!("{value:.2} °C")
}

/// Success becomes the display line; any failure becomes an error carrying
/// the user-facing message.
pub fn render(result: &LookupResult) -> Result<String> {
    match result {
        Ok(value) => Ok(celsius(*value)),
        Err(e) => Err(anyhow!("{e}")),
    }
}
