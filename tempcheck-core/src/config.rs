use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Top-level configuration stored on disk.
///
/// Loaded once at startup and passed by reference to whatever builds the
/// HTTP clients. Every field has a default, so a missing or partial file is fine.
///
/// Example TOML:
/// ```toml
/// forecast_base_url = "https://api.open-meteo.com"
/// geocoding_base_url = "https://geocoding-api.open-meteo.com"
/// language = "de"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host serving `/v1/forecast`.
    pub forecast_base_url: String,

    /// Host serving `/v1/search`.
    pub geocoding_base_url: String,

    /// Language passed to the geocoder, e.g. "en" or "ja".
    pub language: String,

    /// Per-request timeout in milliseconds. Unset keeps the HTTP client's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_base_url: DEFAULT_FORECAST_BASE_URL.to_string(),
            geocoding_base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_ms: None,
        }
    }
}

impl Config {
    /// Load config from the platform path, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit file. Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tempcheck", "tempcheck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url("forecast_base_url", &self.forecast_base_url)?;
        validate_base_url("geocoding_base_url", &self.geocoding_base_url)?;

        if self.language.trim().is_empty() {
            bail!("`language` must not be empty");
        }

        if self.timeout_ms == Some(0) {
            bail!("`timeout_ms` must be greater than zero");
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Full URL of the forecast endpoint.
    pub fn forecast_url(&self) -> String {
        join_url(&self.forecast_base_url, "v1/forecast")
    }

    /// Full URL of the geocoding search endpoint.
    pub fn geocoding_url(&self) -> String {
        join_url(&self.geocoding_base_url, "v1/search")
    }
}

/// Check that `value` looks like an http(s) base URL.
pub fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("`{field}` must start with http:// or https://, got '{value}'"))?;

    if rest.trim_end_matches('/').is_empty() {
        bail!("`{field}` has no host: '{value}'");
    }

    Ok(())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim().trim_end_matches('/'), path)
}
