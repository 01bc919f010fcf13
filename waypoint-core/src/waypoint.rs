//! Route stops tracked for arrival announcements.

use geo::Coord;

use crate::PlaceRef;

/// A route stop annotated with its arrival status.
///
/// The visited flag can only move from `false` to `true`; a fresh route
/// always starts with new waypoints.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::Waypoint;
///
/// let mut stop = Waypoint::new("Museum", Coord { x: 0.0, y: 0.0 });
/// assert!(stop.mark_visited());
/// assert!(!stop.mark_visited());
/// assert!(stop.is_visited());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Display name announced on arrival.
    pub name: String,
    /// Position of the stop.
    pub position: Coord<f64>,
    visited: bool,
}

impl Waypoint {
    /// Create an unvisited waypoint.
    pub fn new(name: impl Into<String>, position: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            position,
            visited: false,
        }
    }

    /// Create an unvisited waypoint for a selected place.
    #[must_use]
    pub fn from_place(place: &PlaceRef) -> Self {
        Self::new(place.name.clone(), place.position)
    }

    /// Whether the tracker has already announced this stop.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Mark the stop visited, returning `true` only on the first call.
    pub const fn mark_visited(&mut self) -> bool {
        let newly_visited = !self.visited;
        self.visited = true;
        newly_visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn from_place_copies_name_and_position() {
        let place = PlaceRef::new("p1", "Cafe", Coord { x: 2.0, y: 3.0 }, "href");
        let waypoint = Waypoint::from_place(&place);
        assert_eq!(waypoint.name, "Cafe");
        assert_eq!(waypoint.position, place.position);
        assert!(!waypoint.is_visited());
    }
}
