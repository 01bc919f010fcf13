//! Behavioural tests for building, driving and finishing a route through a
//! [`Navigator`].

mod support;

use std::cell::{Ref, RefCell};
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use waypoint_core::test_support::{
    FailingRoutingEngine, RecordingAnnouncer, RecordingMapSurface, StraightLineRoutingEngine,
};
use waypoint_core::{
    AppState, BuildRouteError, DriveSummary, Navigator, NavigatorConfig, PlaceStore, Route,
    RoutingEngine, RoutingError,
};

use support::place_at;

struct RouteWorld {
    runtime: Runtime,
    surface: Arc<RecordingMapSurface>,
    announcer: Arc<RecordingAnnouncer>,
    navigator: RefCell<Option<Navigator>>,
    result: RefCell<Option<Result<Route, BuildRouteError>>>,
    summary: RefCell<Option<DriveSummary>>,
}

impl RouteWorld {
    fn install(&self, engine: Arc<dyn RoutingEngine>) {
        let navigator = self.runtime.block_on(async {
            Navigator::new(
                PlaceStore::spawn(),
                engine,
                self.surface.clone(),
                self.announcer.clone(),
                NavigatorConfig::default(),
            )
        });
        *self.navigator.borrow_mut() = Some(navigator);
    }

    fn navigator(&self) -> Ref<'_, Navigator> {
        Ref::map(self.navigator.borrow(), |navigator| {
            navigator.as_ref().expect("navigator must be installed")
        })
    }
}

#[fixture]
fn world() -> RouteWorld {
    RouteWorld {
        runtime: support::runtime(),
        surface: Arc::new(RecordingMapSurface::default()),
        announcer: Arc::new(RecordingAnnouncer::default()),
        navigator: RefCell::new(None),
        result: RefCell::new(None),
        summary: RefCell::new(None),
    }
}

// --- Given steps ---

#[given("a navigator with a working routing engine")]
fn working_engine(#[from(world)] world: &RouteWorld) {
    world.install(Arc::new(StraightLineRoutingEngine));
}

#[given("a navigator whose routing engine finds no route")]
fn failing_engine(#[from(world)] world: &RouteWorld) {
    world.install(Arc::new(FailingRoutingEngine::new(RoutingError::NoRoute)));
}

#[given("the stops \"A\", \"B\" and \"C\" are selected")]
fn select_abc(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    for (name, x) in [("A", 0.0), ("B", 0.01), ("C", 0.02)] {
        navigator.store().push_route_stop(place_at(name, x));
    }
    world.runtime.block_on(navigator.store().settle());
}

// --- When steps ---

#[when("the route is started")]
fn start_route(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    let result = world.runtime.block_on(navigator.start_route());
    *world.result.borrow_mut() = Some(result);
}

#[when("the simulated drive runs to the end")]
fn drive(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    let summary = world.runtime.block_on(navigator.drive());
    *world.summary.borrow_mut() = Some(summary);
}

// --- Then steps ---

#[then("the waypoints are \"A\", \"B\" and \"C\" and none is visited")]
fn waypoints_abc(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    let waypoints = world.runtime.block_on(navigator.store().waypoints());
    let names: Vec<_> = waypoints.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(waypoints.iter().all(|w| !w.is_visited()));
}

#[then("the application is navigating")]
fn navigating(#[from(world)] world: &RouteWorld) {
    assert_eq!(world.navigator().state(), AppState::Navigating);
}

#[then("the application is configuring")]
fn configuring(#[from(world)] world: &RouteWorld) {
    assert_eq!(world.navigator().state(), AppState::Configuring);
}

#[then("the route overlays are drawn on the map")]
fn overlays_drawn(#[from(world)] world: &RouteWorld) {
    let drawn = world.surface.drawn();
    assert_eq!(drawn.len(), 4, "three markers and the path");
    assert_eq!(drawn.iter().filter(|overlay| overlay.is_marker()).count(), 3);
}

#[then("the route fails with no route found")]
fn no_route(#[from(world)] world: &RouteWorld) {
    let result = world.result.borrow();
    assert!(
        matches!(
            result.as_ref(),
            Some(Err(BuildRouteError::Routing(RoutingError::NoRoute)))
        ),
        "expected NoRoute, got {result:?}"
    );
}

#[then("no overlays are published")]
fn no_overlays(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    assert!(world.runtime.block_on(navigator.store().map_objects()).is_empty());
    assert!(world.surface.drawn().is_empty());
}

#[then("every stop was announced in order")]
fn announced_in_order(#[from(world)] world: &RouteWorld) {
    assert_eq!(
        world.announcer.spoken(),
        vec![
            "You have reached A",
            "You have reached B",
            "You have reached C"
        ]
    );
    let summary = world.summary.borrow();
    assert!(summary.as_ref().is_some_and(|summary| summary.completed));
}

#[then("the route list and waypoints are empty")]
fn route_cleared(#[from(world)] world: &RouteWorld) {
    let navigator = world.navigator();
    let snapshot = world.runtime.block_on(navigator.store().snapshot());
    assert!(snapshot.route_list.is_empty());
    assert!(snapshot.waypoints.is_empty());
    assert!(world.surface.drawn().is_empty());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/route_building.feature", name = $title)]
        fn $fn_name(world: RouteWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    building_through_three_stops,
    "building a route through three stops"
);
register_scenario!(no_route_found, "the routing engine finds no route");
register_scenario!(
    simulated_drive_reaches_destination,
    "the simulated drive reaches the destination"
);
