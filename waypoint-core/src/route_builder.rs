//! Turning selected stops into an active route.
//!
//! A successful build installs the stops, their waypoints and the route
//! overlays in the [`PlaceStore`] with one write, moves the application to
//! [`AppState::Navigating`] and starts replaying the route. A failed build
//! changes nothing.

use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};

use crate::overlay::route_overlays;
use crate::{
    AppState, PathStyle, PlaceRef, PlaceStore, PositionEvent, Route, RoutingEngine, RoutingError,
    RoutingMode, SimulatedPositionFeed, SimulationConfig, Waypoint,
};

/// Errors returned by [`RouteBuilder::build_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildRouteError {
    /// A route is already active.
    #[error("a route is already being navigated")]
    AlreadyNavigating,
    /// No stops were supplied.
    #[error("at least one stop is required to build a route")]
    NoStops,
    /// The routing engine failed.
    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),
}

/// Route building settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteBuilderConfig {
    /// Mode passed to the routing engine.
    pub mode: RoutingMode,
    /// Replay settings for the simulated drive.
    pub simulation: SimulationConfig,
    /// Colours of the published route path.
    pub path_style: PathStyle,
    /// Whether a built route is replayed automatically. Disable when a live
    /// position source feeds the navigator instead.
    pub simulate: bool,
}

impl Default for RouteBuilderConfig {
    fn default() -> Self {
        Self {
            mode: RoutingMode::default(),
            simulation: SimulationConfig::default(),
            path_style: PathStyle::default(),
            simulate: true,
        }
    }
}

impl RouteBuilderConfig {
    /// Set the replay settings.
    #[must_use]
    pub const fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Enable or disable the automatic replay.
    #[must_use]
    pub const fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }
}

/// Builds routes and owns the application state and the simulated feed.
pub struct RouteBuilder {
    store: PlaceStore,
    engine: Arc<dyn RoutingEngine>,
    state: watch::Sender<AppState>,
    events: mpsc::Sender<PositionEvent>,
    config: RouteBuilderConfig,
    // Held for the whole build so concurrent builds cannot both succeed.
    feed: Mutex<Option<SimulatedPositionFeed>>,
}

impl std::fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("state", &*self.state.borrow())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteBuilder {
    /// Create a builder in [`AppState::Configuring`].
    ///
    /// Simulated positions are sent to `events`.
    #[must_use]
    pub fn new(
        store: PlaceStore,
        engine: Arc<dyn RoutingEngine>,
        events: mpsc::Sender<PositionEvent>,
        config: RouteBuilderConfig,
    ) -> Self {
        let (state, _) = watch::channel(AppState::Configuring);
        Self {
            store,
            engine,
            state,
            events,
            config,
            feed: Mutex::new(None),
        }
    }

    /// Current application state.
    #[must_use]
    pub fn state(&self) -> AppState {
        *self.state.borrow()
    }

    /// Receive every future state change.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Build a route through `stops` in order and start navigating it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildRouteError::AlreadyNavigating`] outside
    /// [`AppState::Configuring`], [`BuildRouteError::NoStops`] for an empty
    /// list and [`BuildRouteError::Routing`] when the engine fails. None of
    /// them changes any state.
    pub async fn build_route(&self, stops: Vec<PlaceRef>) -> Result<Route, BuildRouteError> {
        let mut feed = self.feed.lock().await;
        if !self.state().accepts_new_route() {
            return Err(BuildRouteError::AlreadyNavigating);
        }
        if stops.is_empty() {
            return Err(BuildRouteError::NoStops);
        }

        let waypoints: Vec<Waypoint> = stops.iter().map(Waypoint::from_place).collect();
        let coordinates: Vec<_> = stops.iter().map(|stop| stop.position).collect();
        let route = match self.engine.compute_route(&coordinates, self.config.mode).await {
            Ok(route) => route,
            Err(err) => {
                warn!("route through {} stops failed: {err}", stops.len());
                return Err(err.into());
            }
        };

        let overlays = route_overlays(&stops, &route.path, self.config.path_style);
        self.store.start_route(stops, waypoints, overlays);
        self.state.send_replace(AppState::Navigating);
        info!(
            "navigating {:.0} m route, expected {} s",
            route.length_metres,
            route.duration.as_secs()
        );

        if self.config.simulate {
            *feed = Some(SimulatedPositionFeed::spawn(
                &route.path,
                self.config.simulation,
                self.events.clone(),
            ));
        }
        Ok(route)
    }

    /// End the active route.
    ///
    /// Stops the simulated feed, clears the route list, the waypoints and the
    /// overlays, and returns to [`AppState::Configuring`] whatever the
    /// waypoints' visited flags were.
    pub async fn on_destination_reached(&self) {
        if let Some(feed) = self.feed.lock().await.take() {
            feed.cancel();
        }
        self.store.finish_route();
        self.store.settle().await;
        self.state.send_replace(AppState::Configuring);
        info!("destination reached; collecting addresses again");
    }
}
