//! Shared route state with a single serialised writer.
//!
//! [`PlaceStore`] holds the search results, the selected route stops, the
//! waypoints of the active route and the map overlays. Reads take a shared
//! section of a fair [`RwLock`] and return copies. Writes are queued on a
//! channel and applied one at a time, in submission order, by a writer task
//! holding the exclusive section. A reader therefore never observes half of a
//! write, and queued writers are not starved by readers.
//!
//! Write methods never block or fail. A write submitted after the writer task
//! has stopped (only possible once the runtime shuts down) is logged and
//! dropped.

mod command;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use geo::Coord;
use log::{debug, warn};
use tokio::sync::{RwLock, mpsc, oneshot};

use crate::{DistanceMetric, MapOverlay, PlaceRef, Waypoint};

use command::{Collections, Command};

/// Monotonic tag identifying which search may publish into `places`.
///
/// Every clear of the places collection starts a new generation. Results
/// tagged with an older generation are stale and are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchGeneration(u64);

impl SearchGeneration {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A consistent copy of every collection in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Results of the latest search.
    pub places: Vec<PlaceRef>,
    /// Stops selected for the route, in selection order.
    pub route_list: Vec<PlaceRef>,
    /// Arrival state for each stop of the active route.
    pub waypoints: Vec<Waypoint>,
    /// Overlays published for the active route.
    pub map_objects: Vec<MapOverlay>,
}

/// Handle to the shared route state.
///
/// Cloning the handle is cheap; all clones address the same store. The writer
/// task stops once every handle has been dropped.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use waypoint_core::{PlaceRef, PlaceStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = PlaceStore::spawn();
/// store.push_route_stop(PlaceRef::new("1", "Museum", Coord { x: 0.0, y: 0.0 }, ""));
/// store.settle().await;
/// assert_eq!(store.route_list().await.len(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PlaceStore {
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<RwLock<Collections>>,
    generation: Arc<AtomicU64>,
}

impl PlaceStore {
    /// Create an empty store and spawn its writer on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let state = Arc::new(RwLock::new(Collections::default()));
        tokio::spawn(run_writer(receiver, Arc::clone(&state)));
        Self {
            commands,
            state,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Copy every collection at one consistent point in time.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.data.clone()
    }

    /// Copy of the current search results.
    pub async fn places(&self) -> Vec<PlaceRef> {
        self.state.read().await.data.places.clone()
    }

    /// Copy of the selected route stops.
    pub async fn route_list(&self) -> Vec<PlaceRef> {
        self.state.read().await.data.route_list.clone()
    }

    /// Copy of the active route's waypoints.
    pub async fn waypoints(&self) -> Vec<Waypoint> {
        self.state.read().await.data.waypoints.clone()
    }

    /// Copy of the published overlays.
    pub async fn map_objects(&self) -> Vec<MapOverlay> {
        self.state.read().await.data.map_objects.clone()
    }

    /// Generation of the most recent clear of the places collection.
    #[must_use]
    pub fn current_generation(&self) -> SearchGeneration {
        SearchGeneration(self.generation.load(Ordering::Acquire))
    }

    /// Append one search result if `generation` is still current.
    pub fn append_place(&self, generation: SearchGeneration, place: PlaceRef) {
        self.submit(Command::AppendPlace { generation, place });
    }

    /// Replace the search results if `generation` is still current.
    pub fn publish_search_results(&self, generation: SearchGeneration, places: Vec<PlaceRef>) {
        self.submit(Command::PublishPlaces { generation, places });
    }

    /// Empty the search results and start a new search generation.
    ///
    /// Results from any search started before this call will be discarded.
    pub fn clear_places(&self) -> SearchGeneration {
        let generation = self.next_generation();
        self.submit(Command::ClearPlaces { generation });
        generation
    }

    /// Append a stop to the route list.
    ///
    /// Only valid while configuring. Once [`PlaceStore::start_route`] has
    /// installed a route, the route list must stay in step with the
    /// waypoints, so callers gate this on [`crate::AppState::Configuring`]
    /// (as [`crate::AddressEntry::select`] does).
    pub fn push_route_stop(&self, place: PlaceRef) {
        self.submit(Command::PushRouteStop(place));
    }

    /// Empty the route list together with its waypoints.
    pub fn clear_route_list(&self) {
        self.submit(Command::ClearRouteList);
    }

    /// Atomically swap the entire overlay set.
    pub fn replace_map_objects(&self, overlays: Vec<MapOverlay>) {
        self.submit(Command::ReplaceMapObjects(overlays));
    }

    /// Remove every published overlay.
    pub fn clear_map_objects(&self) {
        self.submit(Command::ClearMapObjects);
    }

    /// Clear the search results, the route list and the waypoints together.
    pub fn remove_all_data(&self) -> SearchGeneration {
        let generation = self.next_generation();
        self.submit(Command::RemoveAllData { generation });
        generation
    }

    /// Install the stops, waypoints and overlays of a new route in one write.
    pub fn start_route(
        &self,
        stops: Vec<PlaceRef>,
        waypoints: Vec<Waypoint>,
        overlays: Vec<MapOverlay>,
    ) {
        self.submit(Command::StartRoute {
            stops,
            waypoints,
            overlays,
        });
    }

    /// Drop the route list, waypoints and overlays in one write.
    pub fn finish_route(&self) {
        self.submit(Command::FinishRoute);
    }

    /// Mark every unvisited waypoint closer than `radius` as visited.
    ///
    /// The check and the update happen inside one exclusive section, so
    /// concurrent callers can never report the same waypoint twice. Returns
    /// the waypoints that flipped, in route order.
    pub async fn visit_within(
        &self,
        position: Coord<f64>,
        radius: f64,
        metric: DistanceMetric,
    ) -> Vec<Waypoint> {
        let (reply, response) = oneshot::channel();
        self.submit(Command::VisitWithin {
            position,
            radius,
            metric,
            reply,
        });
        response.await.unwrap_or_default()
    }

    /// Wait until every write submitted before this call has been applied.
    pub async fn settle(&self) {
        let (reply, response) = oneshot::channel();
        self.submit(Command::Settle(reply));
        if response.await.is_err() {
            warn!("place store writer stopped before settling");
        }
    }

    fn next_generation(&self) -> SearchGeneration {
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        SearchGeneration(previous.wrapping_add(1))
    }

    fn submit(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("place store writer has stopped; dropping write");
        }
    }
}

async fn run_writer(
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: Arc<RwLock<Collections>>,
) {
    while let Some(command) = commands.recv().await {
        let mut guard = state.write().await;
        command.apply(&mut guard);
    }
    debug!("place store writer stopped");
}
