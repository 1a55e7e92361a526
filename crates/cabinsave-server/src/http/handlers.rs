//! HTTP handlers for the REST API.
//!
//! Handlers stay thin: they validate the query and hand off to the
//! resolver, estimator or savings model. Upstream trouble never reaches
//! the client as an error; those paths already degrade to fallback data.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

use cabinsave_calc::{CalculatorInputs, SavingsReport};
use cabinsave_weather::{FrostEstimate, LocationCandidate};

use super::dto::{FrostQuery, GeocodeQuery, HealthResponse};
use super::error::HttpError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, HttpError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Location and climate
// =============================================================================

/// GET /geocode?q=...
///
/// Up to eight candidate places. A blank query yields an empty list.
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> HandlerResult<Vec<LocationCandidate>> {
    let q = query.q.unwrap_or_default();
    let candidates = state.geocoder.resolve(&q).await;
    tracing::debug!(query = %q.trim(), count = candidates.len(), "Geocode request served");
    Ok(Json(candidates))
}

/// GET /frost?lat=...&lon=...
///
/// Winter length for the last completed season at the given point.
pub async fn frost(
    State(state): State<AppState>,
    Query(query): Query<FrostQuery>,
) -> HandlerResult<FrostEstimate> {
    let (latitude, longitude) = query.coordinates()?;
    let estimate = state.estimator.estimate(latitude, longitude).await;
    Ok(Json(estimate))
}

// =============================================================================
// Savings
// =============================================================================

/// POST /calculate
///
/// Savings for the submitted answers. Incomplete answers give a zero report;
/// a body that is not valid JSON for the inputs is a 400.
pub async fn calculate(
    payload: Result<Json<CalculatorInputs>, JsonRejection>,
) -> HandlerResult<SavingsReport> {
    let Json(inputs) = payload?;
    Ok(Json(SavingsReport::from_inputs(&inputs)))
}
