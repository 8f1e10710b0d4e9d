// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected status {status} from {target}")]
    Status {
        status: reqwest::StatusCode,
        target: String,
    },

    #[error("Invalid CSS selector `{0}`")]
    Selector(String),
}
