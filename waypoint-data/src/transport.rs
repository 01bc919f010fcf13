//! HTTP client construction and failure classification shared by the
//! adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "waypoint-nav/0.1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Build a client with the adapter's user agent and timeouts.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Parse a base URL, dropping any trailing slash from its path.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderBuildError> {
    let mut url = Url::parse(base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })?;
    let trimmed = url.path().trim_end_matches('/').to_owned();
    url.set_path(&trimmed);
    Ok(url)
}

/// Transport-level outcome of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Timeout,
    Status { status: u16, message: String },
    Network { message: String },
}

impl TransportFailure {
    pub(crate) fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = error.status() {
            return Self::Status {
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        Self::Network {
            message: error.to_string(),
        }
    }
}
