//! Navigate command implementation for the waypoint CLI.
//!
//! Drives the address form exactly as an interactive user would: each
//! address is typed, the debounced search settles and the first result is
//! selected. The route is then started and the simulated drive consumed to
//! the destination.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypoint_core::{
    AddressEntry, EntryConfig, LogAnnouncer, LogMapSurface, Navigator, NavigatorConfig,
    PlaceStore, SimulationConfig,
};
use waypoint_data::{OsrmRoutingEngineConfig, PhotonPlacesServiceConfig};

use crate::{
    ARG_ARRIVAL_RADIUS, ARG_DEBOUNCE_MS, ARG_FIRST, ARG_ORIGIN_LAT, ARG_ORIGIN_LON,
    ARG_OSRM_BASE_URL, ARG_PHOTON_BASE_URL, ARG_SECOND, ARG_SPEED, ARG_THIRD, ARG_TICK_MS,
    CliError, ENV_FIRST, ENV_SECOND, ENV_THIRD, Services, resolve_origin, write_json,
};

/// CLI arguments for the `navigate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Collect three addresses through the address form, build a \
                 route through the first match of each with OSRM, and replay \
                 the route as a simulated drive. Map updates and arrival \
                 announcements are logged; a summary is printed as JSON.",
    about = "Navigate a route through three addresses"
)]
#[ortho_config(prefix = "WAYPOINT")]
pub(crate) struct NavigateArgs {
    /// First address.
    #[arg(long = ARG_FIRST, value_name = "address")]
    #[serde(default)]
    pub(crate) first: Option<String>,
    /// Second address.
    #[arg(long = ARG_SECOND, value_name = "address")]
    #[serde(default)]
    pub(crate) second: Option<String>,
    /// Third address and destination.
    #[arg(long = ARG_THIRD, value_name = "address")]
    #[serde(default)]
    pub(crate) third: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the Photon service (e.g. "https://photon.komoot.io").
    #[arg(long = ARG_PHOTON_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) photon_base_url: Option<String>,
    /// Longitude searches are biased towards.
    #[arg(long = ARG_ORIGIN_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lon: Option<f64>,
    /// Latitude searches are biased towards.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
    /// Simulated driving speed in metres per second.
    #[arg(long = ARG_SPEED, value_name = "m/s")]
    #[serde(default)]
    pub(crate) speed: Option<f64>,
    /// Interval between simulated positions in milliseconds.
    #[arg(long = ARG_TICK_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) tick_ms: Option<u64>,
    /// Distance in metres within which a stop counts as reached.
    #[arg(long = ARG_ARRIVAL_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) arrival_radius: Option<f64>,
    /// Quiet period before a search is sent, in milliseconds.
    #[arg(long = ARG_DEBOUNCE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) debounce_ms: Option<u64>,
}

impl NavigateArgs {
    pub(crate) fn into_config(self) -> Result<NavigateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NavigateConfig::try_from(merged)
    }
}

/// Resolved `navigate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NavigateConfig {
    pub(crate) addresses: [String; 3],
    pub(crate) osrm: OsrmRoutingEngineConfig,
    pub(crate) photon: PhotonPlacesServiceConfig,
    pub(crate) navigator: NavigatorConfig,
    pub(crate) entry: EntryConfig,
}

fn require(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<String, CliError> {
    value
        .filter(|address| !address.trim().is_empty())
        .ok_or(CliError::MissingArgument { field, env })
}

fn positive(value: f64, field: &'static str) -> Result<f64, CliError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CliError::InvalidSetting {
            field,
            reason: "must be a positive number",
        })
    }
}

impl TryFrom<NavigateArgs> for NavigateConfig {
    type Error = CliError;

    fn try_from(args: NavigateArgs) -> Result<Self, Self::Error> {
        let addresses = [
            require(args.first, ARG_FIRST, ENV_FIRST)?,
            require(args.second, ARG_SECOND, ENV_SECOND)?,
            require(args.third, ARG_THIRD, ENV_THIRD)?,
        ];
        let osrm = args
            .osrm_base_url
            .map_or_else(OsrmRoutingEngineConfig::default, OsrmRoutingEngineConfig::new);
        let photon = args
            .photon_base_url
            .map_or_else(PhotonPlacesServiceConfig::default, PhotonPlacesServiceConfig::new);

        let mut simulation = SimulationConfig::default();
        if let Some(speed) = args.speed {
            simulation = simulation.with_speed_mps(positive(speed, ARG_SPEED)?);
        }
        if let Some(tick_ms) = args.tick_ms {
            if tick_ms == 0 {
                return Err(CliError::InvalidSetting {
                    field: ARG_TICK_MS,
                    reason: "must be at least 1",
                });
            }
            simulation = simulation.with_tick(Duration::from_millis(tick_ms));
        }
        let mut navigator = NavigatorConfig::default();
        navigator.route = navigator.route.with_simulation(simulation);
        if let Some(radius) = args.arrival_radius {
            navigator.tracker = navigator
                .tracker
                .with_arrival_radius(positive(radius, ARG_ARRIVAL_RADIUS)?);
        }

        let mut entry = EntryConfig {
            origin: resolve_origin(args.origin_lon, args.origin_lat)?,
            ..EntryConfig::default()
        };
        if let Some(debounce_ms) = args.debounce_ms {
            entry.debounce = Duration::from_millis(debounce_ms);
        }

        Ok(Self {
            addresses,
            osrm,
            photon,
            navigator,
            entry,
        })
    }
}

/// Summary printed once the drive ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NavigateReport {
    /// Numbered stops as listed by the completed form.
    pub(crate) stops: Vec<String>,
    pub(crate) length_metres: f64,
    pub(crate) duration_secs: u64,
    /// Position updates consumed during the drive.
    pub(crate) updates: usize,
    /// Stops reached, in arrival order.
    pub(crate) reached: Vec<String>,
    pub(crate) completed: bool,
}

pub(crate) async fn run_navigate_with(
    config: NavigateConfig,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = navigate(config, services).await?;
    write_json(writer, &report)
}

async fn navigate(
    config: NavigateConfig,
    services: &dyn Services,
) -> Result<NavigateReport, CliError> {
    let places = services.places(&config.photon)?;
    let engine = services.routing(&config.osrm)?;

    let store = PlaceStore::spawn();
    let navigator = Navigator::new(
        store.clone(),
        engine,
        Arc::new(LogMapSurface),
        Arc::new(LogAnnouncer),
        config.navigator,
    );
    let mut entry = AddressEntry::new(store, places, navigator.subscribe_state(), config.entry);

    for address in config.addresses {
        select_first_match(&mut entry, address).await?;
    }
    let stops = entry.rows().await;
    info!("starting route through {}", stops.join(", "));

    let route = entry.start(&navigator).await?;
    let summary = navigator.drive().await;
    Ok(NavigateReport {
        stops,
        length_metres: route.length_metres,
        duration_secs: route.duration.as_secs(),
        updates: summary.updates,
        reached: summary.reached.into_iter().map(|waypoint| waypoint.name).collect(),
        completed: summary.completed,
    })
}

async fn select_first_match(entry: &mut AddressEntry, address: String) -> Result<(), CliError> {
    entry.on_text_changed(&address);
    entry.wait_for_results().await;
    let Some(best) = entry.rows().await.into_iter().next() else {
        return Err(CliError::NoMatch { address });
    };
    info!("{address:?} resolved to {best:?}");
    entry.select(0).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NavigateConfig, CliError> {
    let merged = NavigateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NavigateConfig::try_from(merged)
}
