//! Photon geocoder response types.
//!
//! Photon answers with a GeoJSON `FeatureCollection` of OpenStreetMap
//! objects. Only the fields needed to build a [`PlaceRef`] are decoded.
//!
//! See: <https://github.com/komoot/photon#search-api>

use geo::Coord;
use serde::Deserialize;
use waypoint_core::PlaceRef;

/// Photon search response.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    /// Matching objects, best first.
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One search result.
#[derive(Debug, Deserialize)]
pub struct Feature {
    /// Point geometry of the result.
    pub geometry: PointGeometry,
    /// OpenStreetMap tags and address parts.
    #[serde(default)]
    pub properties: Properties,
}

/// A GeoJSON `Point`.
#[derive(Debug, Deserialize)]
pub struct PointGeometry {
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

/// Properties Photon attaches to a feature.
#[derive(Debug, Default, Deserialize)]
pub struct Properties {
    /// OpenStreetMap object id.
    pub osm_id: Option<u64>,
    /// `N`, `W` or `R` for node, way or relation.
    pub osm_type: Option<String>,
    /// Object name.
    pub name: Option<String>,
    /// Street of the address.
    pub street: Option<String>,
    /// House number of the address.
    pub housenumber: Option<String>,
    /// City of the address.
    pub city: Option<String>,
    /// Country of the address.
    pub country: Option<String>,
}

impl Properties {
    fn osm_kind(&self) -> Option<&'static str> {
        match self.osm_type.as_deref() {
            Some("N") => Some("node"),
            Some("W") => Some("way"),
            Some("R") => Some("relation"),
            _ => None,
        }
    }

    /// Label built from the name and address, most specific part first.
    ///
    /// Empty parts are skipped and a part equal to the previous one (a city
    /// named after itself, say) is written once.
    pub fn display_name(&self) -> Option<String> {
        let street = match (self.street.as_deref(), self.housenumber.as_deref()) {
            (Some(street), Some(number)) => Some(format!("{street} {number}")),
            (Some(street), None) => Some(street.to_owned()),
            (None, _) => None,
        };
        let mut parts: Vec<String> = Vec::new();
        for part in [
            self.name.clone(),
            street,
            self.city.clone(),
            self.country.clone(),
        ]
        .into_iter()
        .flatten()
        {
            let trimmed = part.trim();
            if !trimmed.is_empty() && parts.last().is_none_or(|last| last != trimmed) {
                parts.push(trimmed.to_owned());
            }
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl Feature {
    /// Convert the feature into a [`PlaceRef`].
    ///
    /// `index` identifies features that lack an OpenStreetMap id.
    pub fn into_place(self, index: usize) -> PlaceRef {
        let [x, y] = self.geometry.coordinates;
        let properties = self.properties;
        let id = match (properties.osm_type.as_deref(), properties.osm_id) {
            (Some(kind), Some(osm_id)) => format!("{kind}{osm_id}"),
            _ => format!("photon-{index}"),
        };
        let href = match (properties.osm_kind(), properties.osm_id) {
            (Some(kind), Some(osm_id)) => {
                format!("https://www.openstreetmap.org/{kind}/{osm_id}")
            }
            _ => String::new(),
        };
        let name = properties
            .display_name()
            .unwrap_or_else(|| format!("{y:.5}, {x:.5}"));
        PlaceRef::new(id, name, Coord { x, y }, href)
    }
}
