//! Outbound HTTP hygiene: URL redaction and response size limits.

use crate::error::{ConfluenceError, Result};
use url::Url;

/// Longest error body excerpt carried into an error message.
const MAX_ERROR_EXCERPT_CHARS: usize = 512;

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

/// Read a response body, failing once it grows past `max_bytes`.
///
/// # Errors
///
/// Returns a transport error if the body cannot be read or exceeds the limit.
pub async fn read_response_body_limited(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> Result<Vec<u8>> {
    if let Some(len) = response.content_length()
        && len > max_bytes as u64
    {
        return Err(ConfluenceError::Transport(format!(
            "response too large: {len} bytes (limit {max_bytes})"
        )));
    }

    let mut out: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if out.len().saturating_add(chunk.len()) > max_bytes {
            return Err(ConfluenceError::Transport(format!(
                "response too large: exceeded {max_bytes} bytes"
            )));
        }
        out.extend_from_slice(&chunk);
    }

    Ok(out)
}

/// Human-readable message for a non-2xx body.
///
/// Confluence error bodies are JSON with a `message` field; anything else is echoed (truncated).
#[must_use]
pub fn error_excerpt(body: &[u8]) -> String {
    if let Ok(v) = serde_json::from_slice::<serde_json::Value>(body)
        && let Some(message) = v.get("message").and_then(serde_json::Value::as_str)
    {
        return message.to_string();
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() > MAX_ERROR_EXCERPT_CHARS {
        let cut: String = text.chars().take(MAX_ERROR_EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
