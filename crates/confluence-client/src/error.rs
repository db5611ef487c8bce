//! Error type for Confluence operations.

use crate::safety::sanitize_reqwest_error;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfluenceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid page URL: {0}")]
    InvalidUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("Confluence returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("http transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, ConfluenceError>;

impl From<reqwest::Error> for ConfluenceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}
