//! Configuration management for `parkcast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ParkcastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `parkcast` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParkcastConfig {
    /// Remote API endpoints and credentials
    #[serde(default)]
    pub api: ApiConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Search and ranking settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Remote API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Geocoding API key
    #[serde(default)]
    pub geocoding_key: String,
    /// Parks-by-state endpoint
    #[serde(default = "default_parks_url")]
    pub parks_url: String,
    /// Parks directory API key
    #[serde(default)]
    pub parks_key: String,
    /// 5-day / 3-hour forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Forecast API key
    #[serde(default)]
    pub weather_key: String,
    /// Forecast unit system (standard, metric, imperial)
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of park forecasts fetched at once
    #[serde(default = "default_max_concurrent_forecasts")]
    pub max_concurrent_forecasts: usize,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (compact, pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Search and ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of days after today that are scored
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// Give up after this many rejected addresses; unbounded when unset
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_parks_url() -> String {
    "https://developer.nps.gov/api/v1/parks".to_string()
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/2.5/forecast".to_string()
}

fn default_units() -> String {
    "imperial".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_concurrent_forecasts() -> usize {
    4
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("parkcast").join("cache.json"))
        .unwrap_or_else(|| PathBuf::from("cache.json"))
        .to_string_lossy()
        .into_owned()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_forecast_days() -> u32 {
    4
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            geocoding_key: String::new(),
            parks_url: default_parks_url(),
            parks_key: String::new(),
            forecast_url: default_forecast_url(),
            weather_key: String::new(),
            units: default_units(),
            timeout_seconds: default_timeout(),
            max_concurrent_forecasts: default_max_concurrent_forecasts(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
            max_attempts: None,
        }
    }
}

impl ParkcastConfig {
    /// Load configuration from `config_path`, or the default location when
    /// `None`, then apply `PARKCAST_*` environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PARKCAST_API__WEATHER_KEY=... overrides api.weather_key
        builder = builder.add_source(
            Environment::with_prefix("PARKCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ParkcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parkcast").join("config.toml"))
    }

    /// Cache file location as a path
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache.location)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.geocoding_url.is_empty() {
            self.api.geocoding_url = default_geocoding_url();
        }
        if self.api.parks_url.is_empty() {
            self.api.parks_url = default_parks_url();
        }
        if self.api.forecast_url.is_empty() {
            self.api.forecast_url = default_forecast_url();
        }
        if self.api.units.is_empty() {
            self.api.units = default_units();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.api.max_concurrent_forecasts == 0 {
            self.api.max_concurrent_forecasts = default_max_concurrent_forecasts();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.search.forecast_days == 0 {
            self.search.forecast_days = default_forecast_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("api.geocoding_key", &self.api.geocoding_key),
            ("api.parks_key", &self.api.parks_key),
            ("api.weather_key", &self.api.weather_key),
        ];

        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(ParkcastError::config(format!(
                    "{name} is required. Set it in the config file or via PARKCAST_{}.",
                    name.to_uppercase().replace('.', "__")
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(ParkcastError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.api.max_concurrent_forecasts > 32 {
            return Err(
                ParkcastError::config("Concurrent forecast requests cannot exceed 32").into(),
            );
        }

        // The forecast service only covers five days ahead
        if self.search.forecast_days > 5 {
            return Err(ParkcastError::config("Forecast days cannot exceed 5").into());
        }

        if self.search.max_attempts == Some(0) {
            return Err(ParkcastError::config("Max attempts must be at least 1 when set").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ParkcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["compact", "pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ParkcastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_units = ["standard", "metric", "imperial"];
        if !valid_units.contains(&self.api.units.as_str()) {
            return Err(ParkcastError::config(format!(
                "Invalid units '{}'. Must be one of: {}",
                self.api.units,
                valid_units.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Geocoding", &self.api.geocoding_url),
            ("Parks", &self.api.parks_url),
            ("Forecast", &self.api.forecast_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ParkcastError::config(format!(
                    "{name} API URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
