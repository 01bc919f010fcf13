//! Mutations applied by the store's writer task.

use geo::Coord;
use log::debug;
use tokio::sync::oneshot;

use super::{SearchGeneration, StoreSnapshot};
use crate::{DistanceMetric, MapOverlay, PlaceRef, Waypoint, tracker};

/// State owned by the writer task and shared with readers.
#[derive(Debug, Default)]
pub(super) struct Collections {
    pub(super) data: StoreSnapshot,
    /// Newest generation seen by a clear of `places`.
    pub(super) generation: SearchGeneration,
}

impl Collections {
    fn accepts(&self, generation: SearchGeneration) -> bool {
        generation == self.generation
    }

    fn observe(&mut self, generation: SearchGeneration) {
        // Clears can race to the channel; the newest generation always wins.
        self.generation = self.generation.max(generation);
    }
}

pub(super) enum Command {
    AppendPlace {
        generation: SearchGeneration,
        place: PlaceRef,
    },
    PublishPlaces {
        generation: SearchGeneration,
        places: Vec<PlaceRef>,
    },
    ClearPlaces {
        generation: SearchGeneration,
    },
    PushRouteStop(PlaceRef),
    ClearRouteList,
    ReplaceMapObjects(Vec<MapOverlay>),
    ClearMapObjects,
    RemoveAllData {
        generation: SearchGeneration,
    },
    StartRoute {
        stops: Vec<PlaceRef>,
        waypoints: Vec<Waypoint>,
        overlays: Vec<MapOverlay>,
    },
    FinishRoute,
    VisitWithin {
        position: Coord<f64>,
        radius: f64,
        metric: DistanceMetric,
        reply: oneshot::Sender<Vec<Waypoint>>,
    },
    Settle(oneshot::Sender<()>),
}

impl Command {
    pub(super) fn apply(self, state: &mut Collections) {
        match self {
            Self::AppendPlace { generation, place } => {
                if state.accepts(generation) {
                    state.data.places.push(place);
                } else {
                    debug!("dropping place from stale search {generation:?}");
                }
            }
            Self::PublishPlaces { generation, places } => {
                if state.accepts(generation) {
                    state.data.places = places;
                } else {
                    debug!(
                        "dropping {} places from stale search {generation:?}",
                        places.len()
                    );
                }
            }
            Self::ClearPlaces { generation } => {
                state.observe(generation);
                state.data.places.clear();
            }
            Self::PushRouteStop(place) => state.data.route_list.push(place),
            Self::ClearRouteList => {
                state.data.route_list.clear();
                state.data.waypoints.clear();
            }
            Self::ReplaceMapObjects(overlays) => state.data.map_objects = overlays,
            Self::ClearMapObjects => state.data.map_objects.clear(),
            Self::RemoveAllData { generation } => {
                state.observe(generation);
                state.data.places.clear();
                state.data.route_list.clear();
                state.data.waypoints.clear();
            }
            Self::StartRoute {
                stops,
                waypoints,
                overlays,
            } => {
                state.data.route_list = stops;
                state.data.waypoints = waypoints;
                state.data.map_objects = overlays;
            }
            Self::FinishRoute => {
                state.data.route_list.clear();
                state.data.waypoints.clear();
                state.data.map_objects.clear();
            }
            Self::VisitWithin {
                position,
                radius,
                metric,
                reply,
            } => {
                let waypoints = &mut state.data.waypoints;
                let arrived = tracker::arrivals(waypoints, position, radius, metric)
                    .into_iter()
                    .filter_map(|index| waypoints.get(index).cloned())
                    .collect();
                if reply.send(arrived).is_err() {
                    debug!("arrival reply dropped; caller went away");
                }
            }
            Self::Settle(reply) => {
                if reply.send(()).is_err() {
                    debug!("settle reply dropped; caller went away");
                }
            }
        }
    }
}
