//! Helpers shared by the behaviour tests.
//!
//! Step functions are synchronous, so each world owns a current-thread
//! runtime with a paused clock and blocks on the async API.

use geo::Coord;
use tokio::runtime::{Builder, Runtime};
use waypoint_core::PlaceRef;

/// Build the runtime a behaviour world drives its async calls on.
pub fn runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime should build")
}

/// A place on the equator `x` degrees east of the prime meridian.
pub fn place_at(name: &str, x: f64) -> PlaceRef {
    PlaceRef::new(
        name.to_lowercase(),
        name,
        Coord { x, y: 0.0 },
        format!("https://www.openstreetmap.org/node/{}", name.len()),
    )
}
