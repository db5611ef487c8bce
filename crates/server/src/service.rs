//! rmcp server handler exposing the two Confluence tools.

use crate::gateway::{FetchPageRequest, SearchRequest, ToolGateway};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde_json::Value;

pub const SERVER_NAME: &str = "confluence-mcp";
pub const SERVER_INSTRUCTIONS: &str = "Fetch and search Confluence pages using internal APIs";

#[derive(Clone)]
pub struct ConfluenceMcpService {
    gateway: ToolGateway,
    tool_router: ToolRouter<Self>,
}

impl ConfluenceMcpService {
    #[must_use]
    pub fn new(gateway: ToolGateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl ConfluenceMcpService {
    #[tool(
        name = "confluence_fetch_page",
        description = "Fetch full structured content of a Confluence page by URL"
    )]
    async fn confluence_fetch_page(
        &self,
        Parameters(request): Parameters<FetchPageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.gateway.fetch_page(request).await.into_value();
        Ok(structured_result(value))
    }

    #[tool(
        name = "confluence_search",
        description = "Search Confluence pages using keywords"
    )]
    async fn confluence_search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.gateway.search(request).await.into_value();
        Ok(structured_result(value))
    }
}

/// Failures are already folded into `value`, so the call itself always succeeds.
fn structured_result(value: Value) -> CallToolResult {
    let text = serde_json::to_string(&value).unwrap_or_else(|_| value.to_string());
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(value),
        is_error: Some(false),
        meta: None,
    }
}

#[tool_handler]
impl ServerHandler for ConfluenceMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}
