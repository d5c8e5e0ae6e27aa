use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown stage key: {0}")]
    UnknownStage(String),

    #[error("Non-numeric build count returned by {url}")]
    NonNumericCount { url: String },

    #[error("Malformed metric feed: {0}")]
    MalformedFeed(String),

    #[error("Report rendering failed: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, Error>;
