//! Confluence MCP server: two read-only tools over the Confluence REST API.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod service;
pub mod transport;

pub use gateway::{
    FetchPageFailure, FetchPageRequest, FetchPageResponse, SearchFailure, SearchRequest,
    SearchResponse, ToolGateway,
};
pub use service::ConfluenceMcpService;
