//! Arrival detection for route waypoints.
//!
//! Each position update is compared against every unvisited waypoint. A
//! waypoint strictly closer than the arrival radius is marked visited and
//! announced once; later updates never announce it again.

use std::sync::Arc;

use geo::Coord;
use log::{info, warn};

use crate::{Announcer, DistanceMetric, PlaceStore, Waypoint};

/// Default arrival radius in metres.
pub const DEFAULT_ARRIVAL_RADIUS: f64 = 30.0;

/// Arrival detection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Distance below which a waypoint counts as reached. The boundary is
    /// exclusive.
    pub arrival_radius: f64,
    /// How distances are measured; the radius uses the metric's units.
    pub metric: DistanceMetric,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
            metric: DistanceMetric::Haversine,
        }
    }
}

impl TrackerConfig {
    /// Set the arrival radius.
    #[must_use]
    pub const fn with_arrival_radius(mut self, arrival_radius: f64) -> Self {
        self.arrival_radius = arrival_radius;
        self
    }

    /// Set the distance metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}

/// Mark the unvisited waypoints strictly within `radius` of `position`.
///
/// Returns the indices of the waypoints that were newly marked.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{DistanceMetric, Waypoint, tracker::arrivals};
///
/// let mut stops = vec![
///     Waypoint::new("Edge", Coord { x: 30.0, y: 0.0 }),
///     Waypoint::new("Inside", Coord { x: 29.99, y: 0.0 }),
/// ];
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let hits = arrivals(&mut stops, origin, 30.0, DistanceMetric::Euclidean);
/// assert_eq!(hits, vec![1]);
/// ```
pub fn arrivals(
    waypoints: &mut [Waypoint],
    position: Coord<f64>,
    radius: f64,
    metric: DistanceMetric,
) -> Vec<usize> {
    waypoints
        .iter_mut()
        .enumerate()
        .filter(|(_, waypoint)| !waypoint.is_visited())
        .filter(|(_, waypoint)| metric.distance(position, waypoint.position) < radius)
        .filter_map(|(index, waypoint)| waypoint.mark_visited().then_some(index))
        .collect()
}

/// Text spoken when a waypoint is reached.
#[must_use]
pub fn announcement_text(name: &str) -> String {
    format!("You have reached {name}")
}

/// Marks waypoints visited as positions arrive and announces each once.
#[derive(Clone)]
pub struct WaypointTracker {
    config: TrackerConfig,
    announcer: Arc<dyn Announcer>,
}

impl std::fmt::Debug for WaypointTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointTracker")
            .field("config", &self.config)
            .field("announcer", &"<dyn Announcer>")
            .finish()
    }
}

impl WaypointTracker {
    /// Create a tracker announcing through `announcer`.
    #[must_use]
    pub fn new(config: TrackerConfig, announcer: Arc<dyn Announcer>) -> Self {
        Self { config, announcer }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> TrackerConfig {
        self.config
    }

    /// Process one position update against the store's waypoints.
    ///
    /// Returns the waypoints reached by this update. Speech failures are
    /// logged and otherwise ignored.
    pub async fn on_position_update(
        &self,
        store: &PlaceStore,
        position: Coord<f64>,
    ) -> Vec<Waypoint> {
        let reached = store
            .visit_within(position, self.config.arrival_radius, self.config.metric)
            .await;
        for waypoint in &reached {
            self.announce(waypoint);
        }
        reached
    }

    fn announce(&self, waypoint: &Waypoint) {
        let text = announcement_text(&waypoint.name);
        info!("waypoint reached: {}", waypoint.name);
        if let Err(err) = self.announcer.speak(&text) {
            warn!("failed to announce {:?}: {err}", waypoint.name);
        }
    }
}
