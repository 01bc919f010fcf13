//! Interfaces to the external collaborators of the navigator.
//!
//! Geocoding, routing, map rendering and speech are delegated to services the
//! core does not implement. Each is a trait here so callers can supply HTTP
//! adapters (see `waypoint-data`), platform bindings or test doubles.
//!
//! Async operations produce exactly one terminal result per request. Map and
//! speech calls are fire-and-forget; speech failures are reported back only
//! so they can be logged.

mod error;
mod logging;

use async_trait::async_trait;
use geo::Coord;

use crate::{MapOverlay, PlaceRef, Route, RoutingMode};

pub use error::{AnnounceError, RoutingError, SearchError};
pub use logging::{LogAnnouncer, LogMapSurface};

/// Geocode free-text queries into places.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use geo::Coord;
/// use waypoint_core::{PlaceRef, PlacesService, SearchError};
///
/// struct Gazetteer;
///
/// #[async_trait]
/// impl PlacesService for Gazetteer {
///     async fn search(
///         &self,
///         _origin: Option<Coord<f64>>,
///         query: &str,
///     ) -> Result<Vec<PlaceRef>, SearchError> {
///         if query.trim().is_empty() {
///             return Err(SearchError::EmptyQuery);
///         }
///         Ok(vec![PlaceRef::new("1", query, Coord { x: 0.0, y: 0.0 }, "")])
///     }
/// }
/// ```
#[async_trait]
pub trait PlacesService: Send + Sync {
    /// Search for `query`, biased towards `origin` when supplied.
    async fn search(
        &self,
        origin: Option<Coord<f64>>,
        query: &str,
    ) -> Result<Vec<PlaceRef>, SearchError>;
}

/// Compute drivable routes through ordered coordinates.
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Return a route visiting `coordinates` in order.
    ///
    /// Implementations return [`RoutingError::NoRoute`] when the engine
    /// answers but cannot connect the coordinates.
    async fn compute_route(
        &self,
        coordinates: &[Coord<f64>],
        mode: RoutingMode,
    ) -> Result<Route, RoutingError>;
}

/// A surface that draws overlays and follows the user's position.
pub trait MapSurface: Send + Sync {
    /// Start drawing `overlays`.
    fn add_overlays(&self, overlays: &[MapOverlay]);
    /// Stop drawing `overlays`.
    fn remove_overlays(&self, overlays: &[MapOverlay]);
    /// Centre the view on `position` at `zoom`.
    fn center_on(&self, position: Coord<f64>, zoom: f64);
}

/// Best-effort text-to-speech output.
pub trait Announcer: Send + Sync {
    /// Speak `text`.
    fn speak(&self, text: &str) -> Result<(), AnnounceError>;
}
