//! Command-line interface for the waypoint navigator.
//!
//! `waypoint search` geocodes one query; `waypoint navigate` collects three
//! addresses, builds the route and replays it, logging map updates and
//! arrival announcements.
#![forbid(unsafe_code)]

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use geo::Coord;
use serde::Serialize;
use waypoint_core::{PlacesService, RoutingEngine};
use waypoint_data::{
    OsrmRoutingEngine, OsrmRoutingEngineConfig, PhotonPlacesService, PhotonPlacesServiceConfig,
};

mod error;
mod navigate;
mod search;

pub use error::CliError;

use navigate::NavigateArgs;
use search::SearchArgs;

const ARG_SEARCH_QUERY: &str = "query";
const ARG_FIRST: &str = "first";
const ARG_SECOND: &str = "second";
const ARG_THIRD: &str = "third";
const ARG_PHOTON_BASE_URL: &str = "photon-base-url";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_ORIGIN_LON: &str = "origin-lon";
const ARG_ORIGIN_LAT: &str = "origin-lat";
const ARG_LIMIT: &str = "limit";
const ARG_LANGUAGE: &str = "language";
const ARG_SPEED: &str = "speed";
const ARG_TICK_MS: &str = "tick-ms";
const ARG_ARRIVAL_RADIUS: &str = "arrival-radius";
const ARG_DEBOUNCE_MS: &str = "debounce-ms";
const ENV_SEARCH_QUERY: &str = "WAYPOINT_CMDS_SEARCH_QUERY";
const ENV_FIRST: &str = "WAYPOINT_CMDS_NAVIGATE_FIRST";
const ENV_SECOND: &str = "WAYPOINT_CMDS_NAVIGATE_SECOND";
const ENV_THIRD: &str = "WAYPOINT_CMDS_NAVIGATE_THIRD";

/// Run the waypoint CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration, a service
/// call or writing the output fails.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Search(args) => {
            search::run_search_with(args.into_config()?, &HttpServices, &mut stdout).await
        }
        Command::Navigate(args) => {
            navigate::run_navigate_with(args.into_config()?, &HttpServices, &mut stdout).await
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waypoint",
    about = "Search places and navigate a three-stop route",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up places matching a query.
    Search(SearchArgs),
    /// Collect three addresses and drive the route between them.
    Navigate(NavigateArgs),
}

/// Builds the external services a command talks to.
pub(crate) trait Services {
    fn places(&self, config: &PhotonPlacesServiceConfig)
    -> Result<Arc<dyn PlacesService>, CliError>;

    fn routing(&self, config: &OsrmRoutingEngineConfig)
    -> Result<Arc<dyn RoutingEngine>, CliError>;
}

/// Photon and OSRM over HTTP.
pub(crate) struct HttpServices;

impl Services for HttpServices {
    fn places(
        &self,
        config: &PhotonPlacesServiceConfig,
    ) -> Result<Arc<dyn PlacesService>, CliError> {
        let service = PhotonPlacesService::with_config(config.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(service))
    }

    fn routing(
        &self,
        config: &OsrmRoutingEngineConfig,
    ) -> Result<Arc<dyn RoutingEngine>, CliError> {
        let engine = OsrmRoutingEngine::with_config(config.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(engine))
    }
}

/// Combine the optional origin flags into a coordinate.
fn resolve_origin(lon: Option<f64>, lat: Option<f64>) -> Result<Option<Coord<f64>>, CliError> {
    match (lon, lat) {
        (Some(x), Some(y)) => Ok(Some(Coord { x, y })),
        (None, None) => Ok(None),
        _ => Err(CliError::IncompleteOrigin),
    }
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
