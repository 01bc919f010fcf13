//! The coordinating actor between position sources, the map and the route.
//!
//! While [`AppState::Configuring`] the first position centres the map. While
//! [`AppState::Navigating`] positions feed the [`WaypointTracker`], and
//! reaching the destination tears the route down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use geo::Coord;
use log::{debug, info};
use tokio::sync::{Mutex, mpsc, watch};

use crate::{
    Announcer, AppState, BuildRouteError, MapSurface, PlaceStore, PositionEvent, Route,
    RouteBuilder, RouteBuilderConfig, RoutingEngine, TrackerConfig, Waypoint, WaypointTracker,
};

/// Zoom level used when centring on the first position fix.
pub const DEFAULT_CENTER_ZOOM: f64 = 13.25;

/// Capacity of the position event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Navigator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorConfig {
    /// Arrival detection settings.
    pub tracker: TrackerConfig,
    /// Route building and replay settings.
    pub route: RouteBuilderConfig,
    /// Zoom applied when centring the map.
    pub center_zoom: f64,
    /// Capacity of the position event channel.
    pub event_buffer: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            route: RouteBuilderConfig::default(),
            center_zoom: DEFAULT_CENTER_ZOOM,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// What [`Navigator::handle_event`] did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The map was centred on the position.
    Centered,
    /// The event had no effect in the current state.
    Ignored,
    /// The position was tracked; carries the waypoints it reached.
    Tracked(Vec<Waypoint>),
    /// The route was torn down.
    DestinationReached,
}

/// Totals gathered by [`Navigator::drive`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveSummary {
    /// Position updates processed.
    pub updates: usize,
    /// Waypoints reached, in arrival order.
    pub reached: Vec<Waypoint>,
    /// Whether the drive ended at the destination.
    pub completed: bool,
}

/// Routes position events according to the application state.
pub struct Navigator {
    store: PlaceStore,
    builder: RouteBuilder,
    tracker: WaypointTracker,
    surface: Arc<dyn MapSurface>,
    sender: mpsc::Sender<PositionEvent>,
    receiver: Mutex<mpsc::Receiver<PositionEvent>>,
    centered: AtomicBool,
    center_zoom: f64,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("builder", &self.builder)
            .field("tracker", &self.tracker)
            .field("centered", &self.centered)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Wire a navigator to its collaborators.
    #[must_use]
    pub fn new(
        store: PlaceStore,
        engine: Arc<dyn RoutingEngine>,
        surface: Arc<dyn MapSurface>,
        announcer: Arc<dyn Announcer>,
        config: NavigatorConfig,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.event_buffer.max(1));
        let builder = RouteBuilder::new(store.clone(), engine, sender.clone(), config.route);
        Self {
            store,
            builder,
            tracker: WaypointTracker::new(config.tracker, announcer),
            surface,
            sender,
            receiver: Mutex::new(receiver),
            centered: AtomicBool::new(false),
            center_zoom: config.center_zoom,
        }
    }

    /// Shared route state.
    #[must_use]
    pub const fn store(&self) -> &PlaceStore {
        &self.store
    }

    /// Current application state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.builder.state()
    }

    /// Receive every future state change.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<AppState> {
        self.builder.subscribe_state()
    }

    /// Sender for a live position source.
    #[must_use]
    pub fn position_sender(&self) -> mpsc::Sender<PositionEvent> {
        self.sender.clone()
    }

    /// Build a route through the store's route list and draw it.
    ///
    /// # Errors
    ///
    /// Propagates [`RouteBuilder::build_route`] failures; nothing is drawn.
    pub async fn start_route(&self) -> Result<Route, BuildRouteError> {
        let stops = self.store.route_list().await;
        let route = self.builder.build_route(stops).await?;
        self.store.settle().await;
        let overlays = self.store.map_objects().await;
        self.surface.add_overlays(&overlays);
        Ok(route)
    }

    /// Apply one position event.
    pub async fn handle_event(&self, event: PositionEvent) -> EventOutcome {
        match (self.state(), event) {
            (AppState::Configuring, PositionEvent::Update(update)) => {
                self.center_once(update.coordinate)
            }
            (AppState::Navigating, PositionEvent::Update(update)) => EventOutcome::Tracked(
                self.tracker
                    .on_position_update(&self.store, update.coordinate)
                    .await,
            ),
            (AppState::Navigating, PositionEvent::DestinationReached) => {
                let overlays = self.store.map_objects().await;
                self.surface.remove_overlays(&overlays);
                self.builder.on_destination_reached().await;
                self.centered.store(false, Ordering::Release);
                EventOutcome::DestinationReached
            }
            (AppState::Configuring, PositionEvent::DestinationReached) => {
                debug!("ignoring destination event with no active route");
                EventOutcome::Ignored
            }
        }
    }

    /// Consume position events until the destination is reached.
    ///
    /// The navigator holds a sender of its own, so the channel only closes
    /// when the navigator is dropped; callers without a feed should not
    /// await this.
    pub async fn drive(&self) -> DriveSummary {
        let mut receiver = self.receiver.lock().await;
        let mut summary = DriveSummary::default();
        while let Some(event) = receiver.recv().await {
            if matches!(event, PositionEvent::Update(_)) {
                summary.updates = summary.updates.saturating_add(1);
            }
            match self.handle_event(event).await {
                EventOutcome::Tracked(reached) => summary.reached.extend(reached),
                EventOutcome::DestinationReached => {
                    summary.completed = true;
                    break;
                }
                EventOutcome::Centered | EventOutcome::Ignored => {}
            }
        }
        info!(
            "drive finished after {} updates, {} waypoints reached",
            summary.updates,
            summary.reached.len()
        );
        summary
    }

    fn center_once(&self, position: Coord<f64>) -> EventOutcome {
        if self.centered.swap(true, Ordering::AcqRel) {
            return EventOutcome::Ignored;
        }
        self.surface.center_on(position, self.center_zoom);
        EventOutcome::Centered
    }
}
