//! Search results referencing real-world locations.

use geo::Coord;

/// A geocoded place returned by a [`PlacesService`](crate::PlacesService).
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The `href`
/// is opaque to the core and only handed back to the service that produced
/// it when more detail is needed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::PlaceRef;
///
/// let place = PlaceRef::new(
///     "N240109189",
///     "Brandenburger Tor, Berlin",
///     Coord { x: 13.377_7, y: 52.516_3 },
///     "https://www.openstreetmap.org/node/240109189",
/// );
/// assert_eq!(place.name, "Brandenburger Tor, Berlin");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceRef {
    /// Identifier assigned by the places service.
    pub id: String,
    /// Human-readable label shown in result lists and announcements.
    pub name: String,
    /// Geographic position of the place.
    pub position: Coord<f64>,
    /// Opaque link used to re-query place details.
    pub href: String,
}

impl PlaceRef {
    /// Construct a `PlaceRef`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Coord<f64>,
        href: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            href: href.into(),
        }
    }
}
