//! Facade crate for the waypoint navigator.
//!
//! This crate re-exports the core navigation types and, behind the `http`
//! feature, the OSRM and Photon service adapters.

#![forbid(unsafe_code)]

pub use waypoint_core::{
    AddressEntry, AnnounceError, Announcer, AppState, BuildRouteError, DriveSummary, FormError,
    FormMachine, FormStep, MapOverlay, MapSurface, Navigator, NavigatorConfig, PlaceRef,
    PlaceStore, PlacesService, PositionEvent, PositionUpdate, Route, RoutingEngine, RoutingError,
    RoutingMode, SearchError, SimulatedPositionFeed, Waypoint, WaypointTracker,
};

#[cfg(feature = "http")]
pub use waypoint_data::{
    OsrmRoutingEngine, OsrmRoutingEngineConfig, PhotonPlacesService, PhotonPlacesServiceConfig,
    ProviderBuildError,
};
