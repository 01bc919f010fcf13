//! OSRM API response types for the Route service.
//!
//! Requests ask for `geometries=geojson`, so each route carries its full path
//! as a GeoJSON `LineString`.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route connects the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first. Absent on failure.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if OSRM reported that the coordinates cannot be connected.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }
}

/// One route of a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct RouteEntry {
    /// Length in metres.
    pub distance: f64,
    /// Expected travel time in seconds.
    pub duration: f64,
    /// Path geometry.
    pub geometry: LineGeometry,
}

/// A GeoJSON `LineString`.
#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    /// `[longitude, latitude]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}
