//! Tool gateway: adapts tool requests to [`ConfluenceApi`] calls.
//!
//! Every failure of the underlying call is caught here and turned into an error envelope that
//! echoes the caller's input. Nothing escapes to the MCP runtime as an error.

use confluence_client::{ConfluenceApi, ConfluenceError};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_MAX_RESULTS: i64 = 5;

fn default_max_results() -> i64 {
    DEFAULT_MAX_RESULTS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct FetchPageRequest {
    /// Full Confluence page URL
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// List of search keywords
    pub keywords: Vec<String>,
    /// Max number of results
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

impl SearchRequest {
    /// A search with the default result limit.
    #[must_use]
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Page content on success, `{ error, url }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchPageResponse {
    Page(Value),
    Failed(FetchPageFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchPageFailure {
    pub error: String,
    pub url: String,
}

/// Search output on success, `{ error, keywords }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Results(Value),
    Failed(SearchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    pub error: String,
    pub keywords: Vec<String>,
}

impl FetchPageResponse {
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Page(v) => v,
            Self::Failed(FetchPageFailure { error, url }) => json!({ "error": error, "url": url }),
        }
    }
}

impl SearchResponse {
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Results(v) => v,
            Self::Failed(SearchFailure { error, keywords }) => {
                json!({ "error": error, "keywords": keywords })
            }
        }
    }
}

#[derive(Clone)]
pub struct ToolGateway {
    api: Arc<dyn ConfluenceApi>,
    call_timeout: Option<Duration>,
}

impl ToolGateway {
    #[must_use]
    pub fn new(api: Arc<dyn ConfluenceApi>) -> Self {
        Self {
            api,
            call_timeout: None,
        }
    }

    /// Bound each call; an elapsed deadline is reported like any other failure.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub async fn fetch_page(&self, request: FetchPageRequest) -> FetchPageResponse {
        let FetchPageRequest { url } = request;
        match self
            .run("confluence_fetch_page", self.api.fetch_page(&url))
            .await
        {
            Ok(page) => FetchPageResponse::Page(page),
            Err(e) => FetchPageResponse::Failed(FetchPageFailure {
                error: e.to_string(),
                url,
            }),
        }
    }

    pub async fn search(&self, request: SearchRequest) -> SearchResponse {
        let SearchRequest {
            keywords,
            max_results,
        } = request;
        match self
            .run(
                "confluence_search",
                self.api.search(&keywords, max_results),
            )
            .await
        {
            Ok(results) => SearchResponse::Results(results),
            Err(e) => SearchResponse::Failed(SearchFailure {
                error: e.to_string(),
                keywords,
            }),
        }
    }

    async fn run<F>(&self, tool: &'static str, call: F) -> Result<Value, ConfluenceError>
    where
        F: Future<Output = Result<Value, ConfluenceError>>,
    {
        let started = Instant::now();
        let result = match self.call_timeout {
            Some(t) => tokio::time::timeout(t, call)
                .await
                .unwrap_or(Err(ConfluenceError::Timeout(t))),
            None => call.await,
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(_) => info!(tool, elapsed_ms, "tool call succeeded"),
            Err(e) => warn!(tool, elapsed_ms, error = %e, "tool call failed"),
        }
        result
    }
}
