//! Log-backed stand-ins for headless runs.

use geo::Coord;
use log::{debug, info};

use super::{AnnounceError, Announcer, MapSurface};
use crate::MapOverlay;

/// Announcer that writes utterances to the log at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn speak(&self, text: &str) -> Result<(), AnnounceError> {
        info!(target: "waypoint::speech", "{text}");
        Ok(())
    }
}

/// Map surface that only logs what it would draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMapSurface;

impl MapSurface for LogMapSurface {
    fn add_overlays(&self, overlays: &[MapOverlay]) {
        debug!(target: "waypoint::map", "adding {} overlays", overlays.len());
    }

    fn remove_overlays(&self, overlays: &[MapOverlay]) {
        debug!(target: "waypoint::map", "removing {} overlays", overlays.len());
    }

    fn center_on(&self, position: Coord<f64>, zoom: f64) {
        debug!(
            target: "waypoint::map",
            "centring on ({}, {}) at zoom {zoom}",
            position.y, position.x
        );
    }
}
