//! Place search backed by the Photon geocoder.
//!
//! [`PhotonPlacesService`] implements [`waypoint_core::PlacesService`]. Each
//! result becomes a [`waypoint_core::PlaceRef`] whose id is the
//! OpenStreetMap object (`N123`, `W456`, `R789`) and whose `href` links to
//! that object on openstreetmap.org.

mod photon;
mod service;

#[doc(hidden)]
pub mod test_support;

pub use service::{DEFAULT_LIMIT, PhotonPlacesService, PhotonPlacesServiceConfig};
