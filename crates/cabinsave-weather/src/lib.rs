//! Location and weather lookups for cabinsave
//!
//! Place search via Nominatim with a static gazetteer fallback, and a
//! winter-length suggestion derived from Open-Meteo historical data.

pub mod types;
pub mod frost;
pub mod gazetteer;
pub mod geocode;
pub mod lookup;

pub use types::*;
pub use frost::WinterLengthEstimator;
pub use geocode::{GeocodeResolver, MAX_CANDIDATES};
pub use lookup::{LookupSequencer, LookupTicket, DEFAULT_DEBOUNCE};
