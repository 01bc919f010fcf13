//! Test utilities for routing engines.
//!
//! This module provides [`StubRoutingEngine`], a deterministic test double
//! for [`RoutingEngine`] that returns pre-configured responses without
//! making HTTP requests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use geo::Coord;
use waypoint_core::{Route, RoutingEngine, RoutingError, RoutingMode};

/// Stub `RoutingEngine` for testing.
///
/// Like the OSRM engine, it rejects requests with fewer than two
/// coordinates before consulting its configured response.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use geo::{Coord, LineString};
/// use waypoint_core::{Route, RoutingEngine, RoutingMode};
/// use waypoint_data::routing::test_support::StubRoutingEngine;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let path = LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]);
/// let route = Route::new(path, 1_113.0, Duration::from_secs(80)).expect("valid route");
/// let engine = StubRoutingEngine::with_route(route.clone());
///
/// let stops = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.0 }];
/// let result = engine.compute_route(&stops, RoutingMode::default()).await;
/// assert_eq!(result, Ok(route));
/// # }
/// ```
#[derive(Debug)]
pub struct StubRoutingEngine {
    response: Result<Route, RoutingError>,
    requests: Mutex<Vec<Vec<Coord<f64>>>>,
}

impl StubRoutingEngine {
    /// Create an engine that answers every request with `route`.
    #[must_use]
    pub const fn with_route(route: Route) -> Self {
        Self {
            response: Ok(route),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create an engine that fails every request with `error`.
    #[must_use]
    pub const fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Coordinates of every accepted request, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Coord<f64>>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RoutingEngine for StubRoutingEngine {
    async fn compute_route(
        &self,
        coordinates: &[Coord<f64>],
        _mode: RoutingMode,
    ) -> Result<Route, RoutingError> {
        if coordinates.len() < 2 {
            return Err(RoutingError::TooFewWaypoints {
                required: 2,
                actual: coordinates.len(),
            });
        }
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(coordinates.to_vec());
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn with_error_returns_configured_error() {
        let engine = StubRoutingEngine::with_error(RoutingError::NetworkError {
            url: "http://example.com".to_owned(),
            message: "connection refused".to_owned(),
        });
        let stops = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];

        let err = engine
            .compute_route(&stops, RoutingMode::default())
            .await
            .expect_err("should fail");

        assert!(matches!(err, RoutingError::NetworkError { .. }));
        assert_eq!(engine.requests().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn single_coordinate_is_rejected() {
        let engine = StubRoutingEngine::with_error(RoutingError::NoRoute);

        let err = engine
            .compute_route(&[Coord { x: 0.0, y: 0.0 }], RoutingMode::default())
            .await
            .expect_err("should fail");

        assert_eq!(
            err,
            RoutingError::TooFewWaypoints {
                required: 2,
                actual: 1
            }
        );
        assert!(engine.requests().is_empty());
    }
}
