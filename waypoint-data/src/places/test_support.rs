//! Test utilities for places services.

use async_trait::async_trait;
use geo::Coord;
use waypoint_core::{PlaceRef, PlacesService, SearchError};

/// Stub `PlacesService` answering every query the same way.
///
/// Blank queries are rejected with [`SearchError::EmptyQuery`], as the
/// Photon service does.
#[derive(Debug, Clone)]
pub struct StubPlacesService {
    response: Result<Vec<PlaceRef>, SearchError>,
}

impl StubPlacesService {
    /// Answer every query with `places`.
    #[must_use]
    pub const fn with_places(places: Vec<PlaceRef>) -> Self {
        Self {
            response: Ok(places),
        }
    }

    /// Fail every query with `error`.
    #[must_use]
    pub const fn with_error(error: SearchError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl PlacesService for StubPlacesService {
    async fn search(
        &self,
        _origin: Option<Coord<f64>>,
        query: &str,
    ) -> Result<Vec<PlaceRef>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        self.response.clone()
    }
}
