//! Position events emitted by live or simulated position sources.

use geo::Coord;

/// A single position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionUpdate {
    /// Current coordinate, `x = longitude`, `y = latitude`.
    pub coordinate: Coord<f64>,
}

impl PositionUpdate {
    /// Wrap a coordinate.
    #[must_use]
    pub const fn new(coordinate: Coord<f64>) -> Self {
        Self { coordinate }
    }
}

/// Event delivered to the [`Navigator`](crate::Navigator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionEvent {
    /// The position changed.
    Update(PositionUpdate),
    /// The position source reached the end of the route.
    DestinationReached,
}
