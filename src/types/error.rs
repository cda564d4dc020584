use thiserror::Error;

/// spotscout error types
#[derive(Error, Debug)]
pub enum SpotScoutError {
    /// Request never produced a response (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Upstream body did not decode into the expected document
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Required query input absent
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// The pipeline ran cleanly but produced nothing
    #[error("no deals found")]
    NoResultsFound,

    /// Region catalog could not be fetched, so no fan-out happened
    #[error("region catalog unavailable: {0}")]
    CatalogUnavailable(#[source] Box<SpotScoutError>),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SpotScoutError {
    fn from(err: reqwest::Error) -> Self {
        SpotScoutError::Network(err.to_string())
    }
}

/// Result type alias for spotscout
pub type Result<T> = std::result::Result<T, SpotScoutError>;
