//! `RoutingEngine` backed by OSRM's Route API.

use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString};
use log::debug;
use reqwest::Client;
use url::Url;
use waypoint_core::{Route, RouteOptimisation, RoutingEngine, RoutingError, RoutingMode, TransportMode};

use super::osrm::RouteResponse;
use crate::transport::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, TransportFailure, build_client,
    parse_base_url,
};

/// Configuration for [`OsrmRoutingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmRoutingEngineConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmRoutingEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmRoutingEngineConfig {
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
}

/// OSRM profile serving `transport`.
const fn profile(transport: TransportMode) -> &'static str {
    match transport {
        TransportMode::Car => "driving",
        TransportMode::Pedestrian => "walking",
        TransportMode::Bicycle => "cycling",
    }
}

/// Routing engine issuing one OSRM Route request per call.
///
/// OSRM always optimises for travel time; a request for
/// [`RouteOptimisation::Shortest`] is served with the fastest route.
#[derive(Debug, Clone)]
pub struct OsrmRoutingEngine {
    client: Client,
    base_url: Url,
    config: OsrmRoutingEngineConfig,
}

impl OsrmRoutingEngine {
    /// Create an engine with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmRoutingEngineConfig::new(base_url))
    }

    /// Create an engine with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: OsrmRoutingEngineConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmRoutingEngineConfig {
        &self.config
    }

    /// Build the Route API URL.
    ///
    /// The format is
    /// `{base_url}/route/v1/{profile}/{coordinates}?overview=full&geometries=geojson`
    /// where coordinates are semicolon-separated `lon,lat` pairs.
    fn build_route_url(&self, coordinates: &[Coord<f64>], mode: RoutingMode) -> String {
        let coords = coordinates
            .iter()
            .map(|coord| format!("{},{}", coord.x, coord.y))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.base_url.as_str().trim_end_matches('/'),
            profile(mode.transport),
            coords
        )
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        match TransportFailure::classify(error) {
            TransportFailure::Timeout => RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status { status, message } => RoutingError::HttpError {
                url: url.to_owned(),
                status,
                message,
            },
            TransportFailure::Network { message } => RoutingError::NetworkError {
                url: url.to_owned(),
                message,
            },
        }
    }
}

/// Convert an OSRM response into a [`Route`], using the first route.
pub(crate) fn convert_response(response: RouteResponse) -> Result<Route, RoutingError> {
    if response.is_no_route() {
        return Err(RoutingError::NoRoute);
    }
    if !response.is_ok() {
        return Err(RoutingError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let first = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute)?;
    let duration =
        Duration::try_from_secs_f64(first.duration).map_err(|err| RoutingError::ParseError {
            message: format!("invalid route duration {}: {err}", first.duration),
        })?;
    let path: LineString<f64> = first
        .geometry
        .coordinates
        .into_iter()
        .map(|[x, y]| Coord { x, y })
        .collect();
    Route::new(path, first.distance, duration)
    .map_err(|err| RoutingError::ParseError {
        message: err.to_string(),
    })
}

#[async_trait]
impl RoutingEngine for OsrmRoutingEngine {
    async fn compute_route(
        &self,
        coordinates: &[Coord<f64>],
        mode: RoutingMode,
    ) -> Result<Route, RoutingError> {
        if coordinates.len() < 2 {
            return Err(RoutingError::TooFewWaypoints {
                required: 2,
                actual: coordinates.len(),
            });
        }
        if mode.optimisation == RouteOptimisation::Shortest {
            debug!("OSRM has no shortest-distance mode; requesting the fastest route");
        }

        let url = self.build_route_url(coordinates, mode);
        debug!("requesting route through {} coordinates", coordinates.len());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // OSRM answers NoRoute and InvalidQuery with 400 and a JSON body, so
        // decode the body before looking at the status.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(decoded) => convert_response(decoded),
            Err(_) if !status.is_success() => Err(RoutingError::HttpError {
                url,
                status: status.as_u16(),
                message: body,
            }),
            Err(err) => Err(RoutingError::ParseError {
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::osrm::{LineGeometry, RouteEntry};
    use rstest::{fixture, rstest};

    #[fixture]
    fn stops() -> Vec<Coord<f64>> {
        vec![Coord { x: -0.1, y: 51.5 }, Coord { x: -0.2, y: 51.6 }]
    }

    fn ok_response(coordinates: Vec<[f64; 2]>) -> RouteResponse {
        RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![RouteEntry {
                distance: 1200.0,
                duration: 150.5,
                geometry: LineGeometry { coordinates },
            }],
        }
    }

    #[rstest]
    #[case(TransportMode::Car, "driving")]
    #[case(TransportMode::Pedestrian, "walking")]
    #[case(TransportMode::Bicycle, "cycling")]
    fn build_route_url_formats_profile_and_coordinates(
        stops: Vec<Coord<f64>>,
        #[case] transport: TransportMode,
        #[case] expected_profile: &str,
    ) {
        let engine = OsrmRoutingEngine::new("http://osrm.example.com/").expect("engine should build");
        let mode = RoutingMode {
            transport,
            ..RoutingMode::default()
        };

        let url = engine.build_route_url(&stops, mode);

        assert_eq!(
            url,
            format!(
                "http://osrm.example.com/route/v1/{expected_profile}/-0.1,51.5;-0.2,51.6?overview=full&geometries=geojson"
            )
        );
    }

    #[rstest]
    fn convert_response_uses_first_route() {
        let route = convert_response(ok_response(vec![[0.0, 0.0], [0.1, 0.1]])).expect("route");

        assert_eq!(route.path.0.len(), 2);
        assert_eq!(route.length_metres, 1200.0);
        assert_eq!(route.duration, Duration::from_secs_f64(150.5));
    }

    #[rstest]
    #[case("NoRoute")]
    #[case("Ok")]
    fn missing_route_maps_to_no_route(#[case] code: &str) {
        let response = RouteResponse {
            code: code.to_owned(),
            message: None,
            routes: Vec::new(),
        };

        assert_eq!(convert_response(response), Err(RoutingError::NoRoute));
    }

    #[rstest]
    fn other_codes_map_to_service_error() {
        let response = RouteResponse {
            code: "InvalidQuery".to_owned(),
            message: Some("Query string malformed".to_owned()),
            routes: Vec::new(),
        };

        assert_eq!(
            convert_response(response),
            Err(RoutingError::ServiceError {
                code: "InvalidQuery".to_owned(),
                message: "Query string malformed".to_owned(),
            })
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(1e30)]
    fn unrepresentable_duration_is_a_parse_error(#[case] duration: f64) {
        let mut response = ok_response(vec![[0.0, 0.0], [0.1, 0.1]]);
        for route in &mut response.routes {
            route.duration = duration;
        }

        let err = convert_response(response).expect_err("duration out of range");
        assert!(matches!(err, RoutingError::ParseError { .. }));
    }

    #[rstest]
    fn degenerate_geometry_is_a_parse_error() {
        let err = convert_response(ok_response(vec![[0.0, 0.0]])).expect_err("one vertex");
        assert!(matches!(err, RoutingError::ParseError { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn single_coordinate_is_rejected_before_any_request() {
        let engine = OsrmRoutingEngine::new("http://127.0.0.1:9").expect("engine should build");

        let err = engine
            .compute_route(&[Coord { x: 0.0, y: 0.0 }], RoutingMode::default())
            .await
            .expect_err("needs two coordinates");

        assert_eq!(
            err,
            RoutingError::TooFewWaypoints {
                required: 2,
                actual: 1
            }
        );
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OsrmRoutingEngineConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
