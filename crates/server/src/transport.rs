//! Serving the MCP service over stdio or streamable HTTP.

use crate::service::ConfluenceMcpService;
use anyhow::Context as _;
use axum::Router;
use axum::routing::get;
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::net::SocketAddr;
use tracing::info;

/// Serve one MCP session on stdin/stdout until the client disconnects.
///
/// # Errors
///
/// Returns an error if the MCP handshake fails or the session ends abnormally.
pub async fn serve_stdio(service: ConfluenceMcpService) -> anyhow::Result<()> {
    info!("serving MCP over stdio");
    let running = service
        .serve(rmcp::transport::stdio())
        .await
        .context("MCP stdio handshake")?;
    let reason = running.waiting().await.context("MCP stdio session")?;
    info!(?reason, "stdio session ended");
    Ok(())
}

/// HTTP surface: streamable MCP at `/mcp`, liveness at `/health`.
pub fn router(service: ConfluenceMcpService) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(service.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", mcp)
}

/// Serve streamable HTTP on `bind` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve_http(service: ConfluenceMcpService, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    let local = listener.local_addr().context("listener address")?;
    info!(addr = %local, "serving MCP over streamable HTTP at /mcp");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("HTTP server")
}
