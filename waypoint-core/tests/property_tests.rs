//! Property-based tests for arrival tracking and the place store.
//!
//! # Invariants tested
//!
//! - **Announce once:** a waypoint is reported at most once however many
//!   positions are processed.
//! - **Complete arrivals:** every waypoint some position came strictly
//!   within the radius of is reported.
//! - **Serialised writes:** after any sequence of writes the store matches a
//!   sequential model; stale search results never land.

use std::collections::HashSet;

use geo::Coord;
use proptest::prelude::*;
use tokio::runtime::Builder;
use waypoint_core::tracker::arrivals;
use waypoint_core::{DistanceMetric, PlaceRef, PlaceStore, SearchGeneration, Waypoint};

fn coordinate() -> impl Strategy<Value = Coord<f64>> {
    (-100.0_f64..100.0, -100.0_f64..100.0).prop_map(|(x, y)| Coord { x, y })
}

fn place(id: usize) -> PlaceRef {
    PlaceRef::new(
        id.to_string(),
        format!("Stop {id}"),
        Coord { x: 0.0, y: 0.0 },
        "",
    )
}

/// A write submitted to the store.
#[derive(Debug, Clone)]
enum Write {
    Search,
    PublishCurrent(usize),
    PublishStale(usize),
    PushStop,
    ClearRouteList,
    StartRoute(usize),
    FinishRoute,
    RemoveAll,
}

fn write() -> impl Strategy<Value = Write> {
    prop_oneof![
        Just(Write::Search),
        (0_usize..4).prop_map(Write::PublishCurrent),
        (1_usize..4).prop_map(Write::PublishStale),
        Just(Write::PushStop),
        Just(Write::ClearRouteList),
        (1_usize..5).prop_map(Write::StartRoute),
        Just(Write::FinishRoute),
        Just(Write::RemoveAll),
    ]
}

/// Sequential model of the store's places and route collections.
#[derive(Debug, Default)]
struct Model {
    places: usize,
    route_list: usize,
    waypoints: usize,
}

fn apply(store: &PlaceStore, model: &mut Model, previous: &mut SearchGeneration, step: &Write) {
    match step {
        Write::Search => {
            *previous = store.current_generation();
            store.clear_places();
            model.places = 0;
        }
        Write::PublishCurrent(count) => {
            let places = (0..*count).map(place).collect();
            store.publish_search_results(store.current_generation(), places);
            model.places = *count;
        }
        Write::PublishStale(count) => {
            if *previous != store.current_generation() {
                let places = (0..*count).map(place).collect();
                store.publish_search_results(*previous, places);
            }
        }
        Write::PushStop => {
            store.push_route_stop(place(model.route_list));
            model.route_list += 1;
        }
        Write::ClearRouteList => {
            store.clear_route_list();
            model.route_list = 0;
            model.waypoints = 0;
        }
        Write::StartRoute(count) => {
            let stops: Vec<_> = (0..*count).map(place).collect();
            let waypoints = stops.iter().map(Waypoint::from_place).collect();
            store.start_route(stops, waypoints, Vec::new());
            model.route_list = *count;
            model.waypoints = *count;
        }
        Write::FinishRoute => {
            store.finish_route();
            model.route_list = 0;
            model.waypoints = 0;
        }
        Write::RemoveAll => {
            *previous = store.current_generation();
            store.remove_all_data();
            *model = Model::default();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: no waypoint is ever reported twice.
    #[test]
    fn each_waypoint_is_reported_at_most_once(
        stops in prop::collection::vec(coordinate(), 1..8),
        positions in prop::collection::vec(coordinate(), 1..30),
        radius in 1.0_f64..60.0,
    ) {
        let mut waypoints: Vec<_> = stops
            .iter()
            .enumerate()
            .map(|(i, position)| Waypoint::new(format!("Stop {i}"), *position))
            .collect();
        let mut seen = HashSet::new();
        for position in &positions {
            for index in arrivals(&mut waypoints, *position, radius, DistanceMetric::Euclidean) {
                prop_assert!(seen.insert(index), "waypoint {index} reported twice");
            }
        }
    }

    /// Property: every waypoint a position came within range of is reported.
    #[test]
    fn every_waypoint_in_range_is_reported(
        stops in prop::collection::vec(coordinate(), 1..8),
        positions in prop::collection::vec(coordinate(), 1..30),
        radius in 1.0_f64..60.0,
    ) {
        let mut waypoints: Vec<_> = stops
            .iter()
            .map(|position| Waypoint::new("Stop", *position))
            .collect();
        for position in &positions {
            arrivals(&mut waypoints, *position, radius, DistanceMetric::Euclidean);
        }
        for (stop, waypoint) in stops.iter().zip(&waypoints) {
            let in_range = positions
                .iter()
                .any(|position| DistanceMetric::Euclidean.distance(*position, *stop) < radius);
            prop_assert_eq!(waypoint.is_visited(), in_range);
        }
    }

    /// Property: queued writes are applied in order, as the model predicts.
    #[test]
    fn writes_match_sequential_model(steps in prop::collection::vec(write(), 0..40)) {
        let runtime = Builder::new_current_thread()
            .build()
            .expect("test runtime should build");
        let (snapshot, model) = runtime.block_on(async {
            let store = PlaceStore::spawn();
            let mut model = Model::default();
            let mut previous = store.current_generation();
            for step in &steps {
                apply(&store, &mut model, &mut previous, step);
            }
            store.settle().await;
            (store.snapshot().await, model)
        });
        prop_assert_eq!(snapshot.places.len(), model.places);
        prop_assert_eq!(snapshot.route_list.len(), model.route_list);
        prop_assert_eq!(snapshot.waypoints.len(), model.waypoints);
    }
}
