//! Authenticated session shared by all Confluence calls.
//!
//! A session is created once at startup with [`ConfluenceSession::init`] and then handed to
//! [`crate::ConfluenceClient`]. It is immutable and cheap to clone.

use crate::config::{Auth, ConfluenceConfig};
use crate::error::{ConfluenceError, Result};
use crate::safety::{error_excerpt, read_response_body_limited, redact_url};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Clone)]
pub struct ConfluenceSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    base_url: Url,
    auth: Auth,
    client: Client,
    max_search_results: i64,
    max_response_bytes: usize,
}

impl ConfluenceSession {
    /// Validate the configuration and build the HTTP session.
    ///
    /// No network traffic happens here; bad credentials surface on the first call.
    ///
    /// # Errors
    ///
    /// Returns a config error if the base URL is invalid, or if the HTTP client cannot be built.
    pub fn init(config: &ConfluenceConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("confluence-mcp/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout.filter(|t| !t.is_zero()) {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfluenceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                base_url,
                auth: config.auth.clone(),
                client,
                max_search_results: config.max_search_results.max(1),
                max_response_bytes: config.max_response_bytes,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn auth(&self) -> &Auth {
        &self.inner.auth
    }

    #[must_use]
    pub fn max_search_results(&self) -> i64 {
        self.inner.max_search_results
    }

    /// Build `{base}/rest/api/{path}` with the given query pairs.
    pub(crate) fn api_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/rest/api/{path}"))
            .map_err(|e| ConfluenceError::InvalidRequest(format!("invalid API path '{path}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Resolve a web UI link (`_links.webui`) against the site root.
    ///
    /// `links_base` is the response's `_links.base` when Confluence supplies it.
    pub(crate) fn web_url(&self, links_base: Option<&str>, webui: &str) -> String {
        if webui.starts_with("http://") || webui.starts_with("https://") {
            return webui.to_string();
        }
        let base = links_base
            .unwrap_or_else(|| self.inner.base_url.as_str())
            .trim_end_matches('/');
        if webui.starts_with('/') {
            format!("{base}{webui}")
        } else {
            format!("{base}/{webui}")
        }
    }

    /// GET a REST endpoint and decode its JSON body.
    pub(crate) async fn get_json(&self, url: Url) -> Result<Value> {
        debug!(url = %redact_url(&url), "confluence request");

        let request = self.inner.auth.apply(self.inner.client.get(url));
        let response = request.send().await?;
        let status = response.status();
        let bytes = read_response_body_limited(response, self.inner.max_response_bytes).await?;

        if !status.is_success() {
            return Err(ConfluenceError::Http {
                status: status.as_u16(),
                message: error_excerpt(&bytes),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ConfluenceError::Decode(format!("response body is not JSON: {e}")))
    }
}

impl std::fmt::Debug for ConfluenceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfluenceSession")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}
