use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),

    /// The provider answered but had nothing for us (no ticker, no bars, no choices).
    #[error("no {0} found")]
    NoData(String),

    #[error("bars out of order at index {index}")]
    Unordered { index: usize },

    #[error("feed interval must be positive, got {0:?}")]
    InvalidInterval(std::time::Duration),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
