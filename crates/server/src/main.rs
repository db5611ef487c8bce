use anyhow::Context as _;
use clap::Parser as _;
use confluence_client::{ConfluenceClient, ConfluenceSession};
use confluence_mcp::config::{Cli, Transport};
use confluence_mcp::{ConfluenceMcpService, ToolGateway, logging, transport};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    let settings = cli.settings()?;
    let session =
        ConfluenceSession::init(&settings.confluence).context("initialize Confluence session")?;
    info!(
        host = session.base_url().host_str().unwrap_or_default(),
        auth = %session.auth(),
        transport = ?cli.transport,
        "Confluence session ready"
    );

    let client = ConfluenceClient::new(session);
    let gateway = ToolGateway::new(Arc::new(client)).with_call_timeout(settings.tool_timeout);
    let service = ConfluenceMcpService::new(gateway);

    match cli.transport {
        Transport::Stdio => transport::serve_stdio(service).await,
        Transport::Http => transport::serve_http(service, cli.bind).await,
    }
}
