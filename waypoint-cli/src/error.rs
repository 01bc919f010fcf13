//! Error types emitted by the waypoint CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use waypoint_core::{FormError, SearchError};
use waypoint_data::ProviderBuildError;

/// Errors emitted by the waypoint CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable carrying the same setting.
        env: &'static str,
    },
    /// Only one of the origin coordinates was given.
    #[error("--origin-lon and --origin-lat must be given together")]
    IncompleteOrigin,
    /// A numeric setting is out of range.
    #[error("invalid {field}: {reason}")]
    InvalidSetting {
        /// Flag name.
        field: &'static str,
        /// What the value must satisfy.
        reason: &'static str,
    },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build client for {base_url:?}: {source}")]
    BuildProvider {
        /// Configured service URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The places service failed.
    #[error("place search failed: {0}")]
    Search(#[from] SearchError),
    /// An address matched no place.
    #[error("no place matches {address:?}")]
    NoMatch {
        /// The unmatched address.
        address: String,
    },
    /// The address form rejected a step or the route could not be built.
    #[error(transparent)]
    Form(#[from] FormError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
