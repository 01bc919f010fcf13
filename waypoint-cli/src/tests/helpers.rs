//! Test doubles standing in for the HTTP services.

use super::*;
use waypoint_core::PlaceRef;
use waypoint_core::test_support::{FixedPlacesService, StraightLineRoutingEngine};

pub(super) const QUAY: &str = "Quay Street";
pub(super) const MILL: &str = "Mill Lane";
pub(super) const HARBOUR: &str = "Harbour Road";

/// Services answering from in-memory doubles.
pub(super) struct StubServices {
    places: Arc<dyn PlacesService>,
    routing: Arc<dyn RoutingEngine>,
}

impl StubServices {
    pub(super) fn new(places: Arc<dyn PlacesService>, routing: Arc<dyn RoutingEngine>) -> Self {
        Self { places, routing }
    }

    /// Three known streets on the equator, roughly 1.1 km apart, routed
    /// with straight segments.
    pub(super) fn streets() -> Self {
        Self::new(Arc::new(street_places()), Arc::new(StraightLineRoutingEngine))
    }
}

impl Services for StubServices {
    fn places(
        &self,
        _config: &PhotonPlacesServiceConfig,
    ) -> Result<Arc<dyn PlacesService>, CliError> {
        Ok(Arc::clone(&self.places))
    }

    fn routing(
        &self,
        _config: &OsrmRoutingEngineConfig,
    ) -> Result<Arc<dyn RoutingEngine>, CliError> {
        Ok(Arc::clone(&self.routing))
    }
}

pub(super) fn place(name: &str, x: f64) -> PlaceRef {
    PlaceRef::new(
        format!("N{}", name.len()),
        name,
        Coord { x, y: 0.0 },
        format!("https://www.openstreetmap.org/node/{}", name.len()),
    )
}

pub(super) fn street_places() -> FixedPlacesService {
    FixedPlacesService::default()
        .with_results(QUAY, vec![place(QUAY, 0.0)])
        .with_results(MILL, vec![place(MILL, 0.01), place("Mill Lane North", 0.011)])
        .with_results(HARBOUR, vec![place(HARBOUR, 0.02)])
}

pub(super) fn street_args() -> crate::navigate::NavigateArgs {
    crate::navigate::NavigateArgs {
        first: Some(QUAY.to_owned()),
        second: Some(MILL.to_owned()),
        third: Some(HARBOUR.to_owned()),
        ..crate::navigate::NavigateArgs::default()
    }
}

pub(super) fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime should build")
}
