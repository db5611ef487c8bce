//! Confluence REST client used by the Confluence MCP server.
//!
//! The crate owns everything that talks to Confluence:
//! - [`session`]: one-time startup initialization (base URL, credentials, HTTP client)
//! - [`page_ref`]: turning a page URL into something the REST API can address
//! - [`client`]: page fetch and keyword search behind the [`ConfluenceApi`] trait
//!
//! It intentionally contains **no** MCP logic. The server crate wraps these calls into tools.

pub mod client;
pub mod config;
pub mod error;
pub mod page_ref;
pub mod safety;
pub mod session;

pub use client::{ConfluenceApi, ConfluenceClient, build_search_cql};
pub use config::{Auth, ConfluenceConfig};
pub use error::{ConfluenceError, Result};
pub use page_ref::PageRef;
pub use session::ConfluenceSession;
