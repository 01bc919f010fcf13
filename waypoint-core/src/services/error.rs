use thiserror::Error;

/// Errors from [`PlacesService::search`](super::PlacesService::search).
///
/// Callers in the core treat every variant as an empty result set; the
/// detail only reaches the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query was empty after trimming.
    #[error("search query must not be empty")]
    EmptyQuery,
    /// Network-level failure (connection refused, DNS failure, etc.).
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse search response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

/// Errors from [`RoutingEngine::compute_route`](super::RoutingEngine::compute_route).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Fewer coordinates than the engine needs were supplied.
    #[error("at least {required} coordinates are required, got {actual}")]
    TooFewWaypoints {
        /// Minimum accepted by the engine.
        required: usize,
        /// Number supplied.
        actual: usize,
    },
    /// The engine found no route between the coordinates.
    #[error("no route connects the requested coordinates")]
    NoRoute,
    /// Network-level failure (connection refused, DNS failure, etc.).
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The engine reported an error code in an otherwise valid response.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Engine status code.
        code: String,
        /// Engine message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

/// Errors from [`Announcer::speak`](super::Announcer::speak).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnounceError {
    /// No audio output is available (e.g. the session could not be opened).
    #[error("speech output unavailable: {0}")]
    Unavailable(String),
    /// The speech engine refused the utterance.
    #[error("speech engine rejected {text:?}")]
    Rejected {
        /// The rejected utterance.
        text: String,
    },
}
