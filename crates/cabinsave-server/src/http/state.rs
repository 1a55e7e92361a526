//! Application state for the HTTP server.

use std::sync::Arc;

use cabinsave_core::{Config, NetworkError};
use cabinsave_weather::{GeocodeResolver, WinterLengthEstimator};

/// Shared application state passed to all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub geocoder: Arc<GeocodeResolver>,
    pub estimator: Arc<WinterLengthEstimator>,
}

impl AppState {
    pub fn new(geocoder: GeocodeResolver, estimator: WinterLengthEstimator) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            estimator: Arc::new(estimator),
        }
    }

    /// Build provider clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, NetworkError> {
        Ok(Self::new(
            GeocodeResolver::new(&config.geocoding)?,
            WinterLengthEstimator::new(&config.weather)?,
        ))
    }
}
