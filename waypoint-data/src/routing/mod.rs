//! Routing engines backed by OSRM.
//!
//! [`OsrmRoutingEngine`] implements [`waypoint_core::RoutingEngine`] by
//! calling the OSRM Route API with the full GeoJSON overview, so the returned
//! [`waypoint_core::Route`] carries the drivable path between the stops.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use waypoint_core::{RoutingEngine, RoutingMode};
//! use waypoint_data::routing::{OsrmRoutingEngine, OsrmRoutingEngineConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OsrmRoutingEngineConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let engine = OsrmRoutingEngine::with_config(config)?;
//!
//! let stops = [Coord { x: 13.3889, y: 52.5170 }, Coord { x: 13.3976, y: 52.5291 }];
//! let route = engine.compute_route(&stops, RoutingMode::default()).await?;
//! println!("{:.0} m in {:?}", route.length_metres, route.duration);
//! # Ok(())
//! # }
//! ```

mod engine;
mod osrm;

#[doc(hidden)]
pub mod test_support;

pub use engine::{OsrmRoutingEngine, OsrmRoutingEngineConfig};
