//! Connection settings for a Confluence site.

use crate::error::{ConfluenceError, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_SEARCH_RESULTS: i64 = 50;
/// 8 MiB.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

/// How requests authenticate against Confluence.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No credentials (public wikis).
    #[default]
    Anonymous,
    /// Atlassian account email + API token.
    Basic { username: String, api_token: String },
    /// Personal access token (Data Center) or OAuth access token.
    Bearer { token: String },
}

impl Auth {
    /// Resolve auth from optional credential pieces.
    ///
    /// # Errors
    ///
    /// Returns a config error if Basic and Bearer credentials are both set, or if only one of
    /// username / API token is set.
    pub fn from_parts(
        username: Option<String>,
        api_token: Option<String>,
        bearer_token: Option<String>,
    ) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (
            non_empty(username),
            non_empty(api_token),
            non_empty(bearer_token),
        ) {
            (None, None, None) => Ok(Self::Anonymous),
            (None, None, Some(token)) => Ok(Self::Bearer { token }),
            (Some(username), Some(api_token), None) => Ok(Self::Basic {
                username,
                api_token,
            }),
            (_, _, Some(_)) => Err(ConfluenceError::Config(
                "ambiguous authentication: set either username + API token OR a bearer token, not both"
                    .to_string(),
            )),
            (Some(_), None, None) => Err(ConfluenceError::Config(
                "username is set but the API token is missing".to_string(),
            )),
            (None, Some(_), None) => Err(ConfluenceError::Config(
                "API token is set but the username is missing".to_string(),
            )),
        }
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Anonymous => request,
            Self::Basic {
                username,
                api_token,
            } => request.basic_auth(username, Some(api_token)),
            Self::Bearer { token } => request.bearer_auth(token),
        }
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Basic { .. } => write!(f, "basic"),
            Self::Bearer { .. } => write!(f, "bearer"),
        }
    }
}

// Never print credentials.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("api_token", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfluenceConfig {
    /// Wiki root, e.g. `https://example.atlassian.net/wiki`.
    pub base_url: String,
    pub auth: Auth,
    /// Per-request HTTP timeout. `None` disables it.
    pub request_timeout: Option<Duration>,
    /// Upper bound applied to a search's `max_results`.
    pub max_search_results: i64,
    pub max_response_bytes: usize,
}

impl ConfluenceConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: Auth::Anonymous,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Parse and normalize the base URL (http/https only, no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns a config error if the URL is empty, malformed or not http(s).
    pub fn parsed_base_url(&self) -> Result<Url> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfluenceError::Config(
                "Confluence base URL is not set".to_string(),
            ));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            ConfluenceError::Config(format!("invalid Confluence base URL '{trimmed}': {e}"))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfluenceError::Config(format!(
                "unsupported Confluence base URL scheme '{other}'"
            ))),
        }
    }
}
