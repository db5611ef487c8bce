//! Error types for the Confluence MCP server.

use thiserror::Error;

/// Startup-time errors. Tool calls never produce these; they report failures as data.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (missing base URL, conflicting credentials, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session initialization errors
    #[error("Startup error: {0}")]
    Startup(#[from] confluence_client::ConfluenceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
