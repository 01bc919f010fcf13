//! Core domain types and coordination logic for the waypoint navigator.
//!
//! Responsibilities:
//! - Hold the shared route state ([`PlaceStore`]) behind a single writer.
//! - Detect waypoint arrivals and announce each stop once
//!   ([`WaypointTracker`]).
//! - Turn selected stops into a route, overlays and a simulated drive
//!   ([`RouteBuilder`]).
//! - Drive the four-step address form ([`FormMachine`], [`AddressEntry`]).
//!
//! Boundaries:
//! - Geocoding, routing, rendering and speech are traits in [`services`];
//!   concrete HTTP adapters live in `waypoint-data`.
//!
//! Invariants:
//! - Readers of the store never observe a partially applied write.
//! - At most one route is active at a time.

pub mod distance;
pub mod form;
pub mod navigator;
pub mod overlay;
pub mod place;
pub mod position;
pub mod route;
pub mod route_builder;
pub mod services;
pub mod simulation;
pub mod state;
pub mod store;
pub mod tracker;
pub mod waypoint;

#[doc(hidden)]
pub mod test_support;

pub use distance::DistanceMetric;
pub use form::{AddressEntry, EntryConfig, FormError, FormMachine, FormStep};
pub use navigator::{DriveSummary, EventOutcome, Navigator, NavigatorConfig};
pub use overlay::{MapOverlay, PathStyle, Rgba, RoutePath};
pub use place::PlaceRef;
pub use position::{PositionEvent, PositionUpdate};
pub use route::{Route, RouteError, RouteOptimisation, RoutingMode, TransportMode};
pub use route_builder::{BuildRouteError, RouteBuilder, RouteBuilderConfig};
pub use services::{
    AnnounceError, Announcer, LogAnnouncer, LogMapSurface, MapSurface, PlacesService,
    RoutingEngine, RoutingError, SearchError,
};
pub use simulation::{SimulatedPositionFeed, SimulationConfig};
pub use state::AppState;
pub use store::{PlaceStore, SearchGeneration, StoreSnapshot};
pub use tracker::{TrackerConfig, WaypointTracker};
pub use waypoint::Waypoint;
