//! Behavioural tests for the OSRM and Photon adapters against a canned
//! loopback HTTP server.

mod support;

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use waypoint_core::{
    PlaceRef, PlacesService, Route, RoutingEngine, RoutingError, RoutingMode, SearchError,
};
use waypoint_data::{OsrmRoutingEngine, PhotonPlacesService};

use support::CannedServer;

const OSRM_ROUTE: &str = r#"{
    "code": "Ok",
    "routes": [{
        "distance": 2140.7,
        "duration": 312.4,
        "geometry": {
            "type": "LineString",
            "coordinates": [[13.3889, 52.517], [13.3931, 52.5225], [13.3976, 52.5291]]
        }
    }],
    "waypoints": []
}"#;

const OSRM_NO_ROUTE: &str = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;

const PHOTON_MUSEUMS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [13.3966, 52.5212]},
            "properties": {"osm_id": 1, "osm_type": "W", "name": "Pergamonmuseum"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [13.3978, 52.5202]},
            "properties": {"osm_id": 2, "osm_type": "R", "name": "Neues Museum"}
        }
    ]
}"#;

struct AdapterWorld {
    runtime: Runtime,
    server: RefCell<Option<CannedServer>>,
    route: RefCell<Option<Result<Route, RoutingError>>>,
    places: RefCell<Option<Result<Vec<PlaceRef>, SearchError>>>,
}

impl AdapterWorld {
    fn serve(&self, status: u16, body: &str) {
        let server = self.runtime.block_on(CannedServer::start(status, body));
        *self.server.borrow_mut() = Some(server);
    }

    fn base_url(&self) -> String {
        self.server
            .borrow()
            .as_ref()
            .map(|server| server.base_url.clone())
            .expect("server must be started")
    }

    fn request_line(&self) -> String {
        self.server
            .borrow()
            .as_ref()
            .and_then(CannedServer::request_line)
            .expect("a request must have been served")
    }
}

#[fixture]
fn world() -> AdapterWorld {
    AdapterWorld {
        runtime: support::runtime(),
        server: RefCell::new(None),
        route: RefCell::new(None),
        places: RefCell::new(None),
    }
}

// --- Given steps ---

#[given("an OSRM service answering with a three-vertex route")]
fn osrm_route(#[from(world)] world: &AdapterWorld) {
    world.serve(200, OSRM_ROUTE);
}

#[given("an OSRM service answering that no route exists")]
fn osrm_no_route(#[from(world)] world: &AdapterWorld) {
    world.serve(400, OSRM_NO_ROUTE);
}

#[given("an OSRM service failing with status 500")]
fn osrm_failure(#[from(world)] world: &AdapterWorld) {
    world.serve(500, "upstream unavailable");
}

#[given("a Photon service answering with two museums")]
fn photon_museums(#[from(world)] world: &AdapterWorld) {
    world.serve(200, PHOTON_MUSEUMS);
}

#[given("a Photon service failing with status 503")]
fn photon_failure(#[from(world)] world: &AdapterWorld) {
    world.serve(503, "{}");
}

#[given("a Photon service answering with a malformed body")]
fn photon_malformed(#[from(world)] world: &AdapterWorld) {
    world.serve(200, r#"{"features": "#);
}

// --- When steps ---

#[when("a driving route through two stops is requested")]
fn request_route(#[from(world)] world: &AdapterWorld) {
    let engine = OsrmRoutingEngine::new(world.base_url()).expect("engine should build");
    let stops = [
        Coord { x: 13.3889, y: 52.517 },
        Coord { x: 13.3976, y: 52.5291 },
    ];
    let result = world
        .runtime
        .block_on(engine.compute_route(&stops, RoutingMode::default()));
    *world.route.borrow_mut() = Some(result);
}

#[when("places matching \"Museum\" are searched")]
fn search_museum(#[from(world)] world: &AdapterWorld) {
    let service = PhotonPlacesService::new(world.base_url()).expect("service should build");
    let result = world.runtime.block_on(service.search(None, "Museum"));
    *world.places.borrow_mut() = Some(result);
}

// --- Then steps ---

#[then("the route follows the three returned vertices")]
fn route_vertices(#[from(world)] world: &AdapterWorld) {
    let borrowed = world.route.borrow();
    let route = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("route should be returned");
    assert_eq!(route.path.0.len(), 3);
    assert_eq!(route.path.0.first(), Some(&Coord { x: 13.3889, y: 52.517 }));
    assert_eq!(route.length_metres, 2140.7);
}

#[then("the request used the driving profile")]
fn driving_profile(#[from(world)] world: &AdapterWorld) {
    let line = world.request_line();
    assert!(
        line.starts_with("GET /route/v1/driving/13.3889,52.517;13.3976,52.5291?"),
        "unexpected request line {line:?}"
    );
    assert!(line.contains("overview=full"));
}

#[then("the routing fails with no route found")]
fn routing_no_route(#[from(world)] world: &AdapterWorld) {
    assert_eq!(*world.route.borrow(), Some(Err(RoutingError::NoRoute)));
}

#[then("the routing fails with HTTP status 500")]
fn routing_http_error(#[from(world)] world: &AdapterWorld) {
    let route = world.route.borrow();
    assert!(
        matches!(
            route.as_ref(),
            Some(Err(RoutingError::HttpError { status: 500, .. }))
        ),
        "expected HTTP 500, got {route:?}"
    );
}

#[then("the places are \"Pergamonmuseum\" and \"Neues Museum\"")]
fn museum_places(#[from(world)] world: &AdapterWorld) {
    let borrowed = world.places.borrow();
    let places = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("places should be returned");
    let names: Vec<_> = places.iter().map(|place| place.name.as_str()).collect();
    assert_eq!(names, vec!["Pergamonmuseum", "Neues Museum"]);
    let hrefs: Vec<_> = places.iter().map(|place| place.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec![
            "https://www.openstreetmap.org/way/1",
            "https://www.openstreetmap.org/relation/2"
        ]
    );
}

#[then("the search request carried the query")]
fn search_query(#[from(world)] world: &AdapterWorld) {
    let line = world.request_line();
    assert!(
        line.starts_with("GET /api?q=Museum&limit=10 "),
        "unexpected request line {line:?}"
    );
}

#[then("the search fails with HTTP status 503")]
fn search_http_error(#[from(world)] world: &AdapterWorld) {
    let places = world.places.borrow();
    assert!(
        matches!(
            places.as_ref(),
            Some(Err(SearchError::HttpError { status: 503, .. }))
        ),
        "expected HTTP 503, got {places:?}"
    );
}

#[then("the search fails to parse the response")]
fn search_parse_error(#[from(world)] world: &AdapterWorld) {
    let places = world.places.borrow();
    assert!(
        matches!(places.as_ref(), Some(Err(SearchError::ParseError { .. }))),
        "expected a parse error, got {places:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_adapters.feature", name = $title)]
        fn $fn_name(world: AdapterWorld) {
            let _ = world;
        }
    };
}

register_scenario!(osrm_returns_route, "OSRM returns a route through the stops");
register_scenario!(osrm_no_route_found, "OSRM reports that no route exists");
register_scenario!(osrm_server_error, "OSRM fails with a server error");
register_scenario!(photon_returns_places, "Photon returns matching places");
register_scenario!(photon_server_error, "Photon fails with a server error");
register_scenario!(photon_malformed_body, "Photon answers with a malformed body");
