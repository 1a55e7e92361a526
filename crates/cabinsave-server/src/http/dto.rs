//! Request and response shapes that exist only at the HTTP boundary.

use serde::{Deserialize, Serialize};

use super::error::{HttpError, MSG_COORDINATES_REQUIRED, MSG_INVALID_COORDINATES};

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Coordinates arrive as raw strings so missing and malformed values can be
/// told apart.
#[derive(Debug, Default, Deserialize)]
pub struct FrostQuery {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

impl FrostQuery {
    pub fn coordinates(&self) -> Result<(f64, f64), HttpError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        let (Some(lat), Some(lon)) = (present(&self.lat), present(&self.lon)) else {
            return Err(HttpError::BadRequest(MSG_COORDINATES_REQUIRED.to_string()));
        };

        // Trailing garbage such as "61.2abc" is rejected, not truncated
        let parse = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
        match (parse(lat), parse(lon)) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(HttpError::BadRequest(MSG_INVALID_COORDINATES.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
