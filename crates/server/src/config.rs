//! Command line, environment and config-file settings.
//!
//! Precedence, highest first: CLI flag, environment variable (both via clap), YAML config file,
//! built-in default.

use crate::error::{Result, ServerError};
use clap::{Parser, ValueEnum};
use confluence_client::config::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_MAX_SEARCH_RESULTS};
use confluence_client::{Auth, ConfluenceConfig, ConfluenceError};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// MCP streamable HTTP on `/mcp`
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "confluence-mcp", version)]
#[command(about = "MCP server exposing Confluence page fetch and search tools")]
pub struct Cli {
    /// YAML config file with Confluence connection settings
    #[arg(long, env = "CONFLUENCE_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Transport to serve MCP on
    #[arg(long, value_enum, env = "CONFLUENCE_MCP_TRANSPORT", default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Listen address for the HTTP transport
    #[arg(long, env = "CONFLUENCE_MCP_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, env = "CONFLUENCE_MCP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, env = "CONFLUENCE_MCP_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Wiki root, e.g. https://example.atlassian.net/wiki
    #[arg(long, env = "CONFLUENCE_BASE_URL")]
    pub base_url: Option<String>,

    /// Account email for API-token (Basic) auth
    #[arg(long, env = "CONFLUENCE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "CONFLUENCE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Personal access token (Bearer auth)
    #[arg(long, env = "CONFLUENCE_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Per-request HTTP timeout towards Confluence (0 disables)
    #[arg(long, env = "CONFLUENCE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Deadline for a whole tool call (unset = no deadline)
    #[arg(long, env = "CONFLUENCE_TOOL_TIMEOUT_SECS")]
    pub tool_timeout_secs: Option<u64>,
}

/// Connection settings read from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub auth: FileAuth,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_search_results: Option<i64>,
    #[serde(default)]
    pub max_response_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileAuth {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl FileConfig {
    /// Load a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// # Errors
    ///
    /// Returns an error if `yaml` is not valid config YAML.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Fully resolved settings for one server process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub confluence: ConfluenceConfig,
    pub tool_timeout: Option<Duration>,
}

impl Cli {
    /// Merge CLI/env values over the config file (if any).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, the base URL is missing, or the
    /// credentials are inconsistent.
    pub fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path).map_err(|e| {
                ServerError::Config(format!("failed to load {}: {e}", path.display()))
            })?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(&self, file: FileConfig) -> Result<Settings> {
        let base_url = self
            .base_url
            .clone()
            .or(file.base_url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ServerError::Config(
                    "Confluence base URL is required (--base-url, CONFLUENCE_BASE_URL or baseUrl in the config file)"
                        .to_string(),
                )
            })?;

        let auth = Auth::from_parts(
            self.username.clone().or(file.auth.username),
            self.api_token.clone().or(file.auth.api_token),
            self.bearer_token.clone().or(file.auth.bearer_token),
        )
        .map_err(|e| match e {
            ConfluenceError::Config(msg) => ServerError::Config(msg),
            other => ServerError::Startup(other),
        })?;

        let request_timeout_secs = self
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_search_results = file
            .max_search_results
            .unwrap_or(DEFAULT_MAX_SEARCH_RESULTS);
        if max_search_results < 1 {
            return Err(ServerError::Config(format!(
                "maxSearchResults must be at least 1 (got {max_search_results})"
            )));
        }

        let confluence = ConfluenceConfig {
            base_url,
            auth,
            request_timeout: (request_timeout_secs > 0)
                .then(|| Duration::from_secs(request_timeout_secs)),
            max_search_results,
            max_response_bytes: file
                .max_response_bytes
                .unwrap_or(DEFAULT_MAX_RESPONSE_BYTES),
        };

        let tool_timeout = self
            .tool_timeout_secs
            .or(file.tool_timeout_secs)
            .filter(|s| *s > 0)
            .map(Duration::from_secs);

        Ok(Settings {
            confluence,
            tool_timeout,
        })
    }
}
