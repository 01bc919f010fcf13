//! `PlacesService` backed by the Photon geocoding API.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::Client;
use url::Url;
use waypoint_core::{PlaceRef, PlacesService, SearchError};

use super::photon::FeatureCollection;
use crate::transport::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, TransportFailure, build_client,
    parse_base_url,
};

/// Default number of results requested per search.
pub const DEFAULT_LIMIT: u8 = 10;

/// Configuration for [`PhotonPlacesService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotonPlacesServiceConfig {
    /// Base URL for the Photon service (e.g., `"https://photon.komoot.io"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of results per search.
    pub limit: u8,
    /// Preferred result language, e.g. `"en"`.
    pub language: Option<String>,
}

impl Default for PhotonPlacesServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://photon.komoot.io".to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            limit: DEFAULT_LIMIT,
            language: None,
        }
    }
}

impl PhotonPlacesServiceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }

    /// Set the preferred result language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Places service issuing one Photon search per call.
#[derive(Debug, Clone)]
pub struct PhotonPlacesService {
    client: Client,
    endpoint: Url,
    config: PhotonPlacesServiceConfig,
}

impl PhotonPlacesService {
    /// Create a service with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(PhotonPlacesServiceConfig::new(base_url))
    }

    /// Create a service with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: PhotonPlacesServiceConfig) -> Result<Self, ProviderBuildError> {
        let mut endpoint = parse_base_url(&config.base_url)?;
        let path = format!("{}/api", endpoint.path().trim_end_matches('/'));
        endpoint.set_path(&path);
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PhotonPlacesServiceConfig {
        &self.config
    }

    /// Build the search URL: `{base_url}/api?q=..&limit=..[&lang=..][&lat=..&lon=..]`.
    fn build_search_url(&self, origin: Option<Coord<f64>>, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("limit", &self.config.limit.to_string());
            if let Some(language) = &self.config.language {
                pairs.append_pair("lang", language);
            }
            if let Some(origin) = origin {
                pairs.append_pair("lat", &origin.y.to_string());
                pairs.append_pair("lon", &origin.x.to_string());
            }
        }
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> SearchError {
        match TransportFailure::classify(error) {
            TransportFailure::Timeout => SearchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status { status, message } => SearchError::HttpError {
                url: url.to_owned(),
                status,
                message,
            },
            TransportFailure::Network { message } => SearchError::NetworkError {
                url: url.to_owned(),
                message,
            },
        }
    }
}

/// Convert a Photon response into places, keeping Photon's order.
pub(crate) fn convert_response(response: FeatureCollection) -> Vec<PlaceRef> {
    response
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature.into_place(index))
        .collect()
}

#[async_trait]
impl PlacesService for PhotonPlacesService {
    async fn search(
        &self,
        origin: Option<Coord<f64>>,
        query: &str,
    ) -> Result<Vec<PlaceRef>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let url = self.build_search_url(origin, query);
        debug!("searching places for {query:?}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        let collection: FeatureCollection =
            response
                .json()
                .await
                .map_err(|err| SearchError::ParseError {
                    message: err.to_string(),
                })?;

        Ok(convert_response(collection))
    }
}
