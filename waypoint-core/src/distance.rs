//! Distance metrics used for arrival detection.

use geo::{Coord, Distance, Euclidean, Haversine, Point};

/// How the distance between a position and a waypoint is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DistanceMetric {
    /// Great-circle distance in metres on a spherical earth.
    #[default]
    Haversine,
    /// Planar distance in raw coordinate units.
    Euclidean,
}

impl DistanceMetric {
    /// Measure the distance between `from` and `to`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use waypoint_core::DistanceMetric;
    ///
    /// let d = DistanceMetric::Euclidean.distance(
    ///     Coord { x: 0.0, y: 0.0 },
    ///     Coord { x: 3.0, y: 4.0 },
    /// );
    /// assert_eq!(d, 5.0);
    /// ```
    #[must_use]
    pub fn distance(self, from: Coord<f64>, to: Coord<f64>) -> f64 {
        let (start, end) = (Point::from(from), Point::from(to));
        match self {
            Self::Haversine => Haversine.distance(start, end),
            Self::Euclidean => Euclidean.distance(start, end),
        }
    }
}
