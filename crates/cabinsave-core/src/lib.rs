pub mod config;
pub mod error;

pub use config::{
    Config, GeocodingConfig, ServerConfig, ValidationResult, WeatherConfig, CONFIG_PATH_ENV,
    GEOCODE_URL_ENV, WEATHER_URL_ENV,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging for the service
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("cabinsave core initialized");
    Ok(())
}
