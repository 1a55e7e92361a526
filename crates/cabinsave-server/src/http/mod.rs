//! axum-based HTTP API.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                   │
//! │  - query parsing and validation               │
//! │  - JSON responses, CORS, compression          │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  cabinsave-weather / cabinsave-calc           │
//! │  - geocoding with gazetteer fallback          │
//! │  - winter length estimate                     │
//! │  - savings model                              │
//! └──────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
