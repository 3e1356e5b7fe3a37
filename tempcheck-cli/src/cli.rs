use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomUserError, Text, validator::Validation};
use std::path::{Path, PathBuf};
use tempcheck_core::{Config, WeatherLookup, config::validate_base_url};

use crate::render::{self, BLANK_LOCATION};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tempcheck", version, about = "Latest hourly temperature for a place")]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the latest hourly temperature for a location.
    Show {
        /// Place name, e.g. "Tokyo, Japan". Prompted for when omitted.
        location: Vec<String>,
    },

    /// Interactively edit API endpoints and geocoding language.
    Configure,

    /// Print where the configuration file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { location } => {
                let config = load_config(self.config.as_ref())?;
                let location = match location_from_args(&location) {
                    Some(text) => text,
                    None => Text::new("Location:")
                        .with_help_message("e.g. Tokyo, Japan")
                        .prompt()
                        .context("Failed to read location")?,
                };

                show(&config, &location).await
            }
            Command::Configure => configure(self.config),
            Command::ConfigPath => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, location: &str) -> Result<()> {
    let location = location.trim();
    if location.is_empty() {
        tracing::debug!("location is blank");
        anyhow::bail!(BLANK_LOCATION);
    }

    let lookup = WeatherLookup::from_config(config)?;
    let result = lookup.lookup(location).await;

    // Errors go to stderr via main; stdout only ever carries a fresh reading.
    let line = render::render(&result)?;
    println!("{line}");
    Ok(())
}

fn configure(explicit: Option<PathBuf>) -> Result<()> {
    let current = match explicit.as_deref() {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(_) => Config::default(),
        None => Config::load()?,
    };

    let forecast_base_url = Text::new("Forecast API base URL:")
        .with_default(&current.forecast_base_url)
        .with_validator(|s: &str| url_validation("forecast_base_url", s))
        .prompt()
        .context("Failed to read forecast API base URL")?;

    let geocoding_base_url = Text::new("Geocoding API base URL:")
        .with_default(&current.geocoding_base_url)
        .with_validator(|s: &str| url_validation("geocoding_base_url", s))
        .prompt()
        .context("Failed to read geocoding API base URL")?;

    let language = Text::new("Geocoding language:")
        .with_default(&current.language)
        .with_help_message("Two-letter code such as en, de or ja")
        .prompt()
        .context("Failed to read geocoding language")?;

    let updated = Config {
        forecast_base_url: forecast_base_url.trim().to_string(),
        geocoding_base_url: geocoding_base_url.trim().to_string(),
        language: language.trim().to_string(),
        timeout_ms: current.timeout_ms,
    };
    let path = persist(&updated, explicit.as_deref())?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Write to `explicit` if given, otherwise to the platform config file.
fn persist(config: &Config, explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            config.save_to(path)?;
            Ok(path.to_path_buf())
        }
        None => {
            config.save()?;
            Config::config_file_path()
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Join positional words; `None` when nothing was given so the caller can prompt.
fn location_from_args(words: &[String]) -> Option<String> {
    if words.is_empty() { None } else { Some(words.join(" ")) }
}

fn url_validation(field: &str, value: &str) -> Result<Validation, CustomUserError> {
    Ok(match validate_base_url(field, value) {
        Ok(()) => Validation::Valid,
        Err(e) => Validation::Invalid(e.to_string().into()),
    })
}
