//! Routes returned by a [`RoutingEngine`](crate::RoutingEngine) and the mode
//! used to request them.

use std::time::Duration;

use geo::LineString;
use thiserror::Error;

/// What the routing engine should optimise for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteOptimisation {
    /// Minimise travel time.
    #[default]
    Fastest,
    /// Minimise travel distance.
    Shortest,
}

/// Means of transport for the route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportMode {
    /// Driving.
    #[default]
    Car,
    /// Walking.
    Pedestrian,
    /// Cycling.
    Bicycle,
}

/// Routing request mode.
///
/// The default is the fastest car route with no special options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingMode {
    /// Optimisation target.
    pub optimisation: RouteOptimisation,
    /// Means of transport.
    pub transport: TransportMode,
}

/// A drivable route through the requested stops.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use geo::LineString;
/// use waypoint_core::Route;
///
/// # fn main() -> Result<(), waypoint_core::RouteError> {
/// let path = LineString::from(vec![(13.37, 52.51), (13.40, 52.52)]);
/// let route = Route::new(path, 2_300.0, Duration::from_secs(240))?;
/// assert_eq!(route.path.0.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Path geometry from the first to the last stop.
    pub path: LineString<f64>,
    /// Total length in metres.
    pub length_metres: f64,
    /// Expected travel time.
    pub duration: Duration,
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The path had fewer than two coordinates.
    #[error("route path must contain at least two coordinates")]
    DegeneratePath,
    /// The length was negative or not finite.
    #[error("route length must be a finite, non-negative number of metres")]
    InvalidLength,
}

impl Route {
    /// Validates and constructs a [`Route`].
    pub fn new(
        path: LineString<f64>,
        length_metres: f64,
        duration: Duration,
    ) -> Result<Self, RouteError> {
        if path.0.len() < 2 {
            return Err(RouteError::DegeneratePath);
        }
        if !length_metres.is_finite() || length_metres < 0.0 {
            return Err(RouteError::InvalidLength);
        }
        Ok(Self {
            path,
            length_metres,
            duration,
        })
    }
}
