use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CABINSAVE_CONFIG";
/// Overrides `geocoding.url`.
pub const GEOCODE_URL_ENV: &str = "CABINSAVE_GEOCODE_URL";
/// Overrides `weather.archive_url`.
pub const WEATHER_URL_ENV: &str = "CABINSAVE_WEATHER_URL";

const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_WEATHER_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DEFAULT_USER_AGENT: &str = "cabinsave/0.1.0 (heating pad savings estimator)";

/// A single validation finding
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Place search provider
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Historical weather provider
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind the HTTP listener to.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim-compatible search endpoint
    pub url: String,

    /// ISO 3166-1 alpha-2 codes the search is restricted to
    pub country_codes: Vec<String>,

    /// Sent with every request; Nominatim rejects anonymous clients
    pub user_agent: String,

    /// Request timeout. Unset means the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GEOCODE_URL.to_string(),
            country_codes: ["no", "se", "dk", "fi"].map(String::from).to_vec(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo-compatible archive endpoint
    pub archive_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_WEATHER_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Provider URLs are the only settings taken from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(GEOCODE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Geocoding URL overridden from {}", GEOCODE_URL_ENV);
            self.geocoding.url = url;
        }
        if let Some(url) = lookup(WEATHER_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Weather URL overridden from {}", WEATHER_URL_ENV);
            self.weather.archive_url = url;
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }
        if let Err(e) = self.server.bind_address() {
            result.add_error("server.host", e.to_string());
        }

        validate_url(&self.geocoding.url, "geocoding.url", &mut result);
        validate_url(&self.weather.archive_url, "weather.archive_url", &mut result);

        if self.geocoding.user_agent.trim().is_empty() {
            result.add_error("geocoding.user_agent", "User agent must not be empty");
        }

        if self.geocoding.country_codes.is_empty() {
            result.add_warning(
                "geocoding.country_codes",
                "No country filter, search is worldwide",
            );
        }
        for code in &self.geocoding.country_codes {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                result.add_warning(
                    "geocoding.country_codes",
                    format!("Not a two-letter country code: {}", code),
                );
            }
        }

        for (field, timeout) in [
            ("geocoding.timeout_secs", self.geocoding.timeout_secs),
            ("weather.timeout_secs", self.weather.timeout_secs),
        ] {
            if timeout == Some(0) {
                result.add_error(field, "Timeout must be greater than 0");
            }
        }

        result
    }

    /// Path of the configuration file
    fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::MissingSetting(CONFIG_PATH_ENV.to_string()))?
            .join("cabinsave");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
