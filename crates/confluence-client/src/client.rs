//! Page fetch and keyword search against the Confluence REST API.

use crate::error::{ConfluenceError, Result};
use crate::page_ref::PageRef;
use crate::session::ConfluenceSession;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

const PAGE_EXPAND: &str = "body.storage,space,version,ancestors";

/// The two Confluence routines the MCP tools delegate to.
///
/// Outputs are plain JSON so callers can pass them through without knowing their shape.
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
    /// Fetch one page (metadata + storage-format body) by its URL.
    async fn fetch_page(&self, url: &str) -> Result<Value>;

    /// Search pages matching any of `keywords`, returning at most `max_results` entries.
    async fn search(&self, keywords: &[String], max_results: i64) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    session: ConfluenceSession,
}

impl ConfluenceClient {
    #[must_use]
    pub fn new(session: ConfluenceSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &ConfluenceSession {
        &self.session
    }

    async fn resolve_page_id(&self, page: PageRef) -> Result<String> {
        match page {
            PageRef::Id(id) => Ok(id),
            PageRef::Title { space, title } => {
                let url = self.session.api_url(
                    "content",
                    &[
                        ("spaceKey", space.as_str()),
                        ("title", title.as_str()),
                        ("type", "page"),
                        ("limit", "1"),
                    ],
                )?;
                let body = self.session.get_json(url).await?;
                body.get("results")
                    .and_then(Value::as_array)
                    .and_then(|r| r.first())
                    .and_then(|p| p.get("id"))
                    .and_then(id_string)
                    .ok_or_else(|| ConfluenceError::NotFound(format!("'{title}' in space {space}")))
            }
        }
    }
}

#[async_trait]
impl ConfluenceApi for ConfluenceClient {
    async fn fetch_page(&self, url: &str) -> Result<Value> {
        let page = PageRef::parse(url)?;
        let page_id = self.resolve_page_id(page).await?;
        debug!(page_id = %page_id, "fetching page");

        let api_url = self
            .session
            .api_url(&format!("content/{page_id}"), &[("expand", PAGE_EXPAND)])?;
        let body = self.session.get_json(api_url).await?;

        Ok(page_from_content(&self.session, &body, url))
    }

    async fn search(&self, keywords: &[String], max_results: i64) -> Result<Value> {
        if max_results < 1 {
            return Err(ConfluenceError::InvalidRequest(format!(
                "max_results must be at least 1 (got {max_results})"
            )));
        }
        let cql = build_search_cql(keywords)?;
        let limit = max_results.min(self.session.max_search_results()).to_string();
        debug!(cql = %cql, limit = %limit, "searching pages");

        let api_url = self.session.api_url(
            "content/search",
            &[("cql", cql.as_str()), ("limit", limit.as_str()), ("expand", "space")],
        )?;
        let body = self.session.get_json(api_url).await?;

        Ok(search_results_from_body(&self.session, &body, &cql))
    }
}

/// Build the CQL for a keyword search: pages whose text matches any keyword.
///
/// # Errors
///
/// Returns [`ConfluenceError::InvalidRequest`] if no keyword has non-blank text.
pub fn build_search_cql(keywords: &[String]) -> Result<String> {
    let clauses: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| format!("text ~ \"{}\"", escape_cql_string(k)))
        .collect();

    if clauses.is_empty() {
        return Err(ConfluenceError::InvalidRequest(
            "at least one non-blank keyword is required".to_string(),
        ));
    }

    Ok(format!("type = page AND ({})", clauses.join(" OR ")))
}

fn escape_cql_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Confluence returns ids as strings, but older servers use numbers.
fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_at<'a>(v: &'a Value, pointer: &str) -> Option<&'a str> {
    v.pointer(pointer).and_then(Value::as_str)
}

fn page_from_content(session: &ConfluenceSession, content: &Value, source_url: &str) -> Value {
    let links_base = str_at(content, "/_links/base");
    let url = str_at(content, "/_links/webui").map(|w| session.web_url(links_base, w));

    let ancestors: Vec<&str> = content
        .get("ancestors")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(|p| p.get("title").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "page_id": content.get("id").and_then(id_string),
        "title": str_at(content, "/title"),
        "space": {
            "key": str_at(content, "/space/key"),
            "name": str_at(content, "/space/name"),
        },
        "version": content.pointer("/version/number").and_then(Value::as_u64),
        "last_updated": str_at(content, "/version/when"),
        "url": url,
        "ancestors": ancestors,
        "body": {
            "representation": str_at(content, "/body/storage/representation").unwrap_or("storage"),
            "value": str_at(content, "/body/storage/value").unwrap_or_default(),
        },
        "source_url": source_url,
    })
}

fn search_results_from_body(session: &ConfluenceSession, body: &Value, cql: &str) -> Value {
    let links_base = str_at(body, "/_links/base");
    let results: Vec<Value> = body
        .get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    json!({
                        "title": str_at(item, "/title"),
                        "space": str_at(item, "/space/key"),
                        "url": str_at(item, "/_links/webui").map(|w| session.web_url(links_base, w)),
                        "page_id": item.get("id").and_then(id_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let total = body
        .get("totalSize")
        .or_else(|| body.get("size"))
        .and_then(Value::as_u64)
        .unwrap_or(results.len() as u64);

    json!({
        "results": results,
        "total": total,
        "cql": cql,
    })
}
