//! Replay of a computed route as a stream of position updates.
//!
//! [`SimulatedPositionFeed`] walks a route path at a fixed speed, emitting one
//! [`PositionEvent::Update`] per tick, starting at the first vertex, and a final
//! [`PositionEvent::DestinationReached`] once the last vertex has been
//! reported.

use std::time::Duration;

use geo::{Coord, Distance, Haversine, LineString, Point};
use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{PositionEvent, PositionUpdate};

/// Default replay speed in metres per second.
pub const DEFAULT_SPEED_MPS: f64 = 85.0;

/// Default interval between simulated fixes.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Replay settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Movement speed along the path in metres per second.
    pub speed_mps: f64,
    /// Interval between emitted positions.
    pub tick: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_mps: DEFAULT_SPEED_MPS,
            tick: DEFAULT_TICK,
        }
    }
}

impl SimulationConfig {
    /// Set the replay speed in metres per second.
    #[must_use]
    pub const fn with_speed_mps(mut self, speed_mps: f64) -> Self {
        self.speed_mps = speed_mps;
        self
    }

    /// Set the tick interval.
    #[must_use]
    pub const fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Distance covered in one tick.
    #[expect(
        clippy::float_arithmetic,
        reason = "step length is speed multiplied by elapsed seconds"
    )]
    fn step_metres(&self) -> f64 {
        self.speed_mps * self.tick.as_secs_f64()
    }
}

/// Position along a path, advanced by distance.
#[derive(Debug, Clone)]
pub(crate) struct PathCursor {
    coords: Vec<Coord<f64>>,
    segment: usize,
    offset: f64,
}

impl PathCursor {
    pub(crate) fn new(path: &LineString<f64>) -> Self {
        Self {
            coords: path.0.clone(),
            segment: 0,
            offset: 0.0,
        }
    }

    /// First vertex of the path.
    pub(crate) fn start(&self) -> Option<Coord<f64>> {
        self.coords.first().copied()
    }

    /// Whether the last vertex has been reached.
    pub(crate) fn is_at_end(&self) -> bool {
        self.segment.saturating_add(1) >= self.coords.len()
    }

    /// Move `distance` metres further and return the new position.
    #[expect(
        clippy::float_arithmetic,
        reason = "walking a polyline interpolates between vertices"
    )]
    pub(crate) fn advance(&mut self, distance: f64) -> Option<Coord<f64>> {
        let mut remaining = self.offset + distance;
        while let (Some(&start), Some(&end)) = (
            self.coords.get(self.segment),
            self.coords.get(self.segment.saturating_add(1)),
        ) {
            let length = Haversine.distance(Point::from(start), Point::from(end));
            if remaining < length {
                self.offset = remaining;
                return Some(interpolate(start, end, remaining / length));
            }
            remaining -= length;
            self.segment += 1;
        }
        self.offset = 0.0;
        self.coords.last().copied()
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "linear interpolation between two vertices"
)]
fn interpolate(start: Coord<f64>, end: Coord<f64>, fraction: f64) -> Coord<f64> {
    Coord {
        x: start.x + (end.x - start.x) * fraction,
        y: start.y + (end.y - start.y) * fraction,
    }
}

/// A running route replay.
///
/// Dropping the handle cancels the replay.
#[derive(Debug)]
pub struct SimulatedPositionFeed {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SimulatedPositionFeed {
    /// Start replaying `path`, sending events to `events`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        path: &LineString<f64>,
        config: SimulationConfig,
        events: mpsc::Sender<PositionEvent>,
    ) -> Self {
        let token = CancellationToken::new();
        let cursor = PathCursor::new(path);
        let task = tokio::spawn(run_feed(cursor, config, events, token.clone()));
        Self { token, task }
    }

    /// Stop emitting positions.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the replay task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SimulatedPositionFeed {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_feed(
    mut cursor: PathCursor,
    config: SimulationConfig,
    events: mpsc::Sender<PositionEvent>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let step = config.step_metres();
    let mut start = cursor.start();
    loop {
        tokio::select! {
            () = token.cancelled() => {
                debug!("position feed cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }
        let position = match start.take() {
            Some(first) => Some(first),
            None if cursor.is_at_end() => None,
            None => cursor.advance(step),
        };
        let event = position.map_or(PositionEvent::DestinationReached, |coordinate| {
            PositionEvent::Update(PositionUpdate::new(coordinate))
        });
        let done = event == PositionEvent::DestinationReached;
        if events.send(event).await.is_err() {
            debug!("position feed receiver dropped");
            return;
        }
        if done {
            debug!("position feed reached the end of the route");
            return;
        }
    }
}
