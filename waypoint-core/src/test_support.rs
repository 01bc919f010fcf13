//! In-memory doubles for the external services, used by unit and behaviour
//! tests and by the CLI's offline tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, Distance, Haversine, LineString, Point};
use tokio::sync::{Notify, Semaphore};

use crate::{
    AnnounceError, Announcer, MapOverlay, MapSurface, PlaceRef, PlacesService, Route,
    RoutingEngine, RoutingError, RoutingMode, SearchError,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `Announcer` that records every spoken phrase.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    spoken: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    /// Phrases spoken so far, oldest first.
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.spoken).clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn speak(&self, text: &str) -> Result<(), AnnounceError> {
        lock(&self.spoken).push(text.to_owned());
        Ok(())
    }
}

/// `Announcer` that rejects every phrase with the same error.
#[derive(Debug)]
pub struct FailingAnnouncer {
    error: AnnounceError,
}

impl FailingAnnouncer {
    /// Fail every call with `error`.
    #[must_use]
    pub const fn new(error: AnnounceError) -> Self {
        Self { error }
    }
}

impl Announcer for FailingAnnouncer {
    fn speak(&self, _text: &str) -> Result<(), AnnounceError> {
        Err(self.error.clone())
    }
}

/// Calls received by a [`RecordingMapSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    /// `add_overlays` with the overlays passed.
    Added(Vec<MapOverlay>),
    /// `remove_overlays` with the overlays passed.
    Removed(Vec<MapOverlay>),
    /// `center_on` with its position and zoom.
    Centered {
        /// Requested centre.
        position: Coord<f64>,
        /// Requested zoom level.
        zoom: f64,
    },
}

/// `MapSurface` that records calls and tracks what is currently drawn.
#[derive(Debug, Default)]
pub struct RecordingMapSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    drawn: Mutex<Vec<MapOverlay>>,
}

impl RecordingMapSurface {
    /// Every call received, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        lock(&self.calls).clone()
    }

    /// Overlays added and not yet removed.
    #[must_use]
    pub fn drawn(&self) -> Vec<MapOverlay> {
        lock(&self.drawn).clone()
    }

    /// Number of `center_on` calls received.
    #[must_use]
    pub fn center_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Centered { .. }))
            .count()
    }
}

impl MapSurface for RecordingMapSurface {
    fn add_overlays(&self, overlays: &[MapOverlay]) {
        lock(&self.drawn).extend_from_slice(overlays);
        lock(&self.calls).push(SurfaceCall::Added(overlays.to_vec()));
    }

    fn remove_overlays(&self, overlays: &[MapOverlay]) {
        lock(&self.drawn).retain(|drawn| !overlays.contains(drawn));
        lock(&self.calls).push(SurfaceCall::Removed(overlays.to_vec()));
    }

    fn center_on(&self, position: Coord<f64>, zoom: f64) {
        lock(&self.calls).push(SurfaceCall::Centered { position, zoom });
    }
}

/// `PlacesService` answering from a fixed table of queries.
///
/// Unknown queries return no results. An empty query is rejected like the
/// HTTP adapters reject it.
#[derive(Debug, Default)]
pub struct FixedPlacesService {
    results: HashMap<String, Vec<PlaceRef>>,
    error: Option<SearchError>,
    queries: Mutex<Vec<String>>,
}

impl FixedPlacesService {
    /// Answer `query` with `places`.
    #[must_use]
    pub fn with_results(mut self, query: impl Into<String>, places: Vec<PlaceRef>) -> Self {
        self.results.insert(query.into(), places);
        self
    }

    /// Fail every search with `error`.
    #[must_use]
    pub fn with_error(mut self, error: SearchError) -> Self {
        self.error = Some(error);
        self
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl PlacesService for FixedPlacesService {
    async fn search(
        &self,
        _origin: Option<Coord<f64>>,
        query: &str,
    ) -> Result<Vec<PlaceRef>, SearchError> {
        lock(&self.queries).push(query.to_owned());
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

/// `PlacesService` that holds every search until the test releases it.
///
/// Answers come from the wrapped [`FixedPlacesService`] once a permit is
/// granted with [`GatedPlacesService::release`].
#[derive(Debug)]
pub struct GatedPlacesService {
    inner: FixedPlacesService,
    gate: Semaphore,
    started: Notify,
}

impl GatedPlacesService {
    /// Gate searches answered by `inner`.
    #[must_use]
    pub fn new(inner: FixedPlacesService) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
            started: Notify::new(),
        }
    }

    /// Let one held or future search complete.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Resolve once a search has reached the gate.
    pub async fn searching(&self) {
        self.started.notified().await;
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.inner.queries()
    }
}

#[async_trait]
impl PlacesService for GatedPlacesService {
    async fn search(
        &self,
        origin: Option<Coord<f64>>,
        query: &str,
    ) -> Result<Vec<PlaceRef>, SearchError> {
        self.started.notify_one();
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        self.inner.search(origin, query).await
    }
}

/// `RoutingEngine` joining the coordinates with straight segments.
///
/// Length is the haversine sum of the segments; duration assumes a constant
/// ten metres per second.
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightLineRoutingEngine;

#[async_trait]
impl RoutingEngine for StraightLineRoutingEngine {
    #[expect(
        clippy::float_arithmetic,
        reason = "route length sums segment distances"
    )]
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
        let length: f64 = coordinates
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(Haversine.distance(Point::from(*from), Point::from(*to))),
                _ => None,
            })
            .sum();
        let duration = Duration::from_secs_f64(length / 10.0);
        Route::new(LineString::from(coordinates.to_vec()), length, duration).map_err(|err| {
            RoutingError::ParseError {
                message: err.to_string(),
            }
        })
    }
}

/// `RoutingEngine` failing every request with the same error.
#[derive(Debug, Clone)]
pub struct FailingRoutingEngine {
    error: RoutingError,
}

impl FailingRoutingEngine {
    /// Fail every request with `error`.
    #[must_use]
    pub const fn new(error: RoutingError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl RoutingEngine for FailingRoutingEngine {
    async fn compute_route(
        &self,
        _coordinates: &[Coord<f64>],
        _mode: RoutingMode,
    ) -> Result<Route, RoutingError> {
        Err(self.error.clone())
    }
}
