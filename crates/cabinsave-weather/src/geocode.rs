//! Forward geocoding: free-text place query to candidate locations.
//! Uses Nominatim (OpenStreetMap) with the static gazetteer as fallback.

use std::collections::HashSet;
use std::time::Duration;

use cabinsave_core::{GeocodingConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde::Deserialize;

use crate::gazetteer;
use crate::types::LocationCandidate;

/// Upper bound on candidates returned for one query
pub const MAX_CANDIDATES: usize = 8;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    lat: serde_json::Value,
    #[serde(default)]
    lon: serde_json::Value,
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    pedestrian: Option<String>,
    footway: Option<String>,
    house_number: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
    city_district: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// "Road 12, Suburb, City, Country", or `None` if no part is present.
    fn label(self) -> Option<String> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let mut parts = Vec::new();

        let road = present(self.road)
            .or(present(self.pedestrian))
            .or(present(self.footway));
        match (road, present(self.house_number)) {
            (Some(road), Some(number)) => parts.push(format!("{} {}", road, number)),
            (Some(road), None) => parts.push(road),
            _ => {}
        }

        if let Some(suburb) = present(self.suburb)
            .or(present(self.neighbourhood))
            .or(present(self.city_district))
        {
            parts.push(suburb);
        }
        if let Some(city) = present(self.city)
            .or(present(self.town))
            .or(present(self.village))
            .or(present(self.municipality))
        {
            parts.push(city);
        }
        if let Some(tail) = present(self.country).or(present(self.postcode)) {
            parts.push(tail);
        }

        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl NominatimPlace {
    fn into_candidate(self) -> Option<LocationCandidate> {
        let latitude = coordinate(&self.lat)?;
        let longitude = coordinate(&self.lon)?;
        let name = self
            .address
            .and_then(NominatimAddress::label)
            .or(self.display_name.filter(|n| !n.is_empty()))?;

        Some(LocationCandidate::new(name, latitude, longitude))
    }
}

/// Nominatim sends coordinates as strings; accept plain numbers too.
fn coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Keep the first candidate per rounded key, up to `MAX_CANDIDATES`.
fn dedup_candidates(candidates: impl IntoIterator<Item = LocationCandidate>) -> Vec<LocationCandidate> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for candidate in candidates {
        if seen.insert(candidate.rounded_key()) {
            unique.push(candidate);
        }
        if unique.len() >= MAX_CANDIDATES {
            break;
        }
    }
    unique
}

/// Resolves place queries against a Nominatim-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct GeocodeResolver {
    client: Client,
    url: String,
    country_codes: String,
}

impl GeocodeResolver {
    pub fn new(config: &GeocodingConfig) -> Result<Self, NetworkError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            country_codes: config.country_codes.join(","),
        })
    }

    /// Candidate locations for `query`, best first.
    ///
    /// Never fails: provider errors and empty provider results fall back to
    /// the built-in gazetteer. A blank query returns nothing without any
    /// network call.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve(&self, query: &str) -> Vec<LocationCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.search_live(query).await {
            Ok(candidates) if !candidates.is_empty() => {
                tracing::debug!("Geocoder returned {} candidates", candidates.len());
                candidates
            }
            Ok(_) => {
                tracing::debug!("Geocoder found nothing, using gazetteer");
                gazetteer::search(query, MAX_CANDIDATES)
            }
            Err(e) => {
                tracing::warn!("Geocode request failed, using gazetteer: {}", e);
                gazetteer::search(query, MAX_CANDIDATES)
            }
        }
    }

    async fn search_live(&self, query: &str) -> Result<Vec<LocationCandidate>, NetworkError> {
        let limit = MAX_CANDIDATES.to_string();
        let mut params = vec![
            ("format", "json"),
            ("limit", limit.as_str()),
            ("addressdetails", "1"),
            ("q", query),
        ];
        if !self.country_codes.is_empty() {
            params.push(("countrycodes", self.country_codes.as_str()));
        }

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: "geocode request failed".to_string(),
            });
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        Ok(dedup_candidates(
            places.into_iter().filter_map(NominatimPlace::into_candidate),
        ))
    }
}
