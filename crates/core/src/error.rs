use schemascope_api::BrowserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemascopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

pub type Result<T> = std::result::Result<T, SchemascopeError>;
