//! Page URL classification.
//!
//! Confluence links a page in several ways. Only some carry the numeric page id directly:
//!
//! | form | example |
//! |---|---|
//! | id in path | `/wiki/spaces/ENG/pages/12345/Title` |
//! | edit link | `/wiki/spaces/ENG/pages/edit-v2/12345` |
//! | id in query | `/pages/viewpage.action?pageId=12345` |
//! | tiny link | `/wiki/x/ew` |
//! | display | `/display/ENG/Some+Title` (needs a title lookup) |

use crate::error::{ConfluenceError, Result};
use base64::Engine as _;
use url::Url;

/// Longest tiny-link code that still fits a `u64` page id.
const MAX_TINY_CODE_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Id(String),
    Title { space: String, title: String },
}

impl PageRef {
    /// Classify a page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::InvalidUrl`] if the URL does not parse, is not http(s), or
    /// matches none of the known page URL forms.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| ConfluenceError::InvalidUrl(format!("'{trimmed}': {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfluenceError::InvalidUrl(format!(
                "'{trimmed}': unsupported scheme '{}'",
                url.scheme()
            )));
        }

        if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "pageId")
            && is_page_id(&id)
        {
            return Ok(Self::Id(id.into_owned()));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        if let Some(id) = page_id_after_pages(&segments) {
            return Ok(Self::Id(id.to_string()));
        }

        if let Some(pos) = segments.iter().position(|s| *s == "display")
            && let (Some(space), Some(title)) = (segments.get(pos + 1), segments.get(pos + 2))
        {
            return Ok(Self::Title {
                space: decode_segment(space),
                title: decode_segment(title),
            });
        }

        // Tiny links end with the code: `/x/<code>`.
        if let [.., "x", code] = segments.as_slice() {
            let id = decode_tiny_code(code).ok_or_else(|| {
                ConfluenceError::InvalidUrl(format!("'{trimmed}': invalid tiny link '{code}'"))
            })?;
            return Ok(Self::Id(id.to_string()));
        }

        Err(ConfluenceError::InvalidUrl(format!(
            "'{trimmed}': no page id, tiny link or /display/ path found"
        )))
    }
}

/// `pages/<id>`, or `pages/<action>/<id>` as in Cloud edit links (`pages/edit-v2/<id>`).
fn page_id_after_pages<'a>(segments: &[&'a str]) -> Option<&'a str> {
    let pos = segments.iter().position(|s| *s == "pages")?;
    segments
        .iter()
        .skip(pos + 1)
        .take(2)
        .copied()
        .find(|s| is_page_id(s))
}

fn is_page_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `+` means space in `/display/` titles; `%2B` is a literal plus.
fn decode_segment(segment: &str) -> String {
    let spaced = segment.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), std::borrow::Cow::into_owned)
}

/// Decode a tiny-link code into a page id.
///
/// The code is URL-safe base64 (`-` for `/`, `_` for `+`, no padding) of the id's little-endian
/// bytes with trailing zero bytes dropped.
#[must_use]
pub fn decode_tiny_code(code: &str) -> Option<u64> {
    if code.is_empty() || code.len() > MAX_TINY_CODE_LEN {
        return None;
    }

    let mut standard: String = code
        .chars()
        .map(|c| match c {
            '-' => '/',
            '_' => '+',
            other => other,
        })
        .collect();
    while standard.len() < MAX_TINY_CODE_LEN {
        standard.push('A');
    }
    standard.push('=');

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(standard)
        .ok()?;
    let bytes: [u8; 8] = bytes.try_into().ok()?;
    let id = u64::from_le_bytes(bytes);
    (id != 0).then_some(id)
}
