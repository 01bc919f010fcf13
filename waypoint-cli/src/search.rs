//! Search command implementation for the waypoint CLI.

use std::io::Write;

use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypoint_data::PhotonPlacesServiceConfig;

use crate::{
    ARG_LANGUAGE, ARG_LIMIT, ARG_ORIGIN_LAT, ARG_ORIGIN_LON, ARG_PHOTON_BASE_URL,
    ARG_SEARCH_QUERY, CliError, ENV_SEARCH_QUERY, Services, resolve_origin, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode a free-text query with the Photon service and print \
                 the matching places as JSON. Results can be biased towards \
                 an origin coordinate.",
    about = "Search for places"
)]
#[ortho_config(prefix = "WAYPOINT")]
pub(crate) struct SearchArgs {
    /// Free-text query, e.g. an address or a landmark.
    #[arg(value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Base URL for the Photon service (e.g. "https://photon.komoot.io").
    #[arg(long = ARG_PHOTON_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) photon_base_url: Option<String>,
    /// Maximum number of results.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<u8>,
    /// Preferred result language, e.g. "en".
    #[arg(long = ARG_LANGUAGE, value_name = "code")]
    #[serde(default)]
    pub(crate) language: Option<String>,
    /// Longitude results are biased towards.
    #[arg(long = ARG_ORIGIN_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lon: Option<f64>,
    /// Latitude results are biased towards.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) photon: PhotonPlacesServiceConfig,
    pub(crate) origin: Option<Coord<f64>>,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_SEARCH_QUERY,
                env: ENV_SEARCH_QUERY,
            })?;
        let mut photon = args
            .photon_base_url
            .map_or_else(PhotonPlacesServiceConfig::default, PhotonPlacesServiceConfig::new);
        if let Some(limit) = args.limit {
            if limit == 0 {
                return Err(CliError::InvalidSetting {
                    field: ARG_LIMIT,
                    reason: "must be at least 1",
                });
            }
            photon = photon.with_limit(limit);
        }
        if let Some(language) = args.language {
            photon = photon.with_language(language);
        }
        let origin = resolve_origin(args.origin_lon, args.origin_lat)?;
        Ok(Self {
            query,
            photon,
            origin,
        })
    }
}

pub(crate) async fn run_search_with(
    config: SearchConfig,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let SearchConfig {
        query,
        photon,
        origin,
    } = config;
    let places = services.places(&photon)?;
    let results = places.search(origin, &query).await?;
    info!("{} places match {query:?}", results.len());
    write_json(writer, &results)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
