use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid strategy parameters or service settings. Raised before any
    /// computation starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Candle input that cannot be computed over: missing fields, bad
    /// values, or timestamps that are not strictly ascending.
    #[error("Malformed candle series: {0}")]
    MalformedSeries(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedSeries(msg.into())
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::MalformedSeries(_) | Error::Json(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
