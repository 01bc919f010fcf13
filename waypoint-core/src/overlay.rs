//! Drawable map objects handed to a [`MapSurface`](crate::MapSurface).
//!
//! The core never renders anything itself; it builds overlays when a route
//! is published and lets the surface decide how to draw them.

use geo::{Coord, LineString};

use crate::PlaceRef;

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; `255` is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque cyan.
    pub const CYAN: Self = Self::opaque(0, 255, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::opaque(128, 128, 128);

    /// Build an opaque colour.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Colours used to draw a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStyle {
    /// Colour of the part already driven.
    pub traveled: Rgba,
    /// Colour of the part still ahead.
    pub active: Rgba,
    /// Outline drawn around the whole path.
    pub outline: Rgba,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            traveled: Rgba::CYAN,
            active: Rgba::GREEN,
            outline: Rgba::GRAY,
        }
    }
}

/// A styled route polyline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePath {
    /// Path geometry, `x = longitude`, `y = latitude`.
    pub line: LineString<f64>,
    /// Drawing colours.
    pub style: PathStyle,
}

/// Opaque drawable handle published for rendering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapOverlay {
    /// A pin marking one route stop.
    Marker {
        /// Where the pin is placed.
        position: Coord<f64>,
        /// Label shown next to the pin.
        label: String,
    },
    /// The route polyline.
    Path(RoutePath),
}

impl MapOverlay {
    /// Marker for a selected stop.
    #[must_use]
    pub fn marker(place: &PlaceRef) -> Self {
        Self::Marker {
            position: place.position,
            label: place.name.clone(),
        }
    }

    /// Styled path overlay.
    #[must_use]
    pub const fn path(line: LineString<f64>, style: PathStyle) -> Self {
        Self::Path(RoutePath { line, style })
    }

    /// Whether this overlay is a stop marker.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }
}

/// Build the overlay set for a route: one marker per stop, then the path.
#[must_use]
pub fn route_overlays(stops: &[PlaceRef], path: &LineString<f64>, style: PathStyle) -> Vec<MapOverlay> {
    stops
        .iter()
        .map(MapOverlay::marker)
        .chain(std::iter::once(MapOverlay::path(path.clone(), style)))
        .collect()
}
