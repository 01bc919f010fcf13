//! HTTP adapters for the navigator's external services.
//!
//! Responsibilities:
//! - Implement [`waypoint_core::RoutingEngine`] against the OSRM Route API.
//! - Implement [`waypoint_core::PlacesService`] against the Photon geocoder.
//! - Provide stub engines for tests that must not touch the network.
//!
//! Boundaries:
//! - Do not encode navigation rules (those live in `waypoint-core`).
//! - Map every transport and decoding failure onto the core error enums.
//!
//! Invariants:
//! - No retries; each call issues at most one request.
//! - No global mutable state.

pub mod places;
pub mod routing;
mod transport;

pub use places::{PhotonPlacesService, PhotonPlacesServiceConfig};
pub use routing::{OsrmRoutingEngine, OsrmRoutingEngineConfig};
pub use transport::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError};
