#![allow(dead_code)]

use anyhow::Context as _;
use std::process::{Child, Command, Stdio};

pub use confluence_test_support::{KillOnDrop, MockServer, pick_unused_port, wait_http_ok};

const ENV_VARS: &[&str] = &[
    "CONFLUENCE_MCP_CONFIG",
    "CONFLUENCE_MCP_TRANSPORT",
    "CONFLUENCE_MCP_BIND",
    "CONFLUENCE_MCP_LOG_LEVEL",
    "CONFLUENCE_MCP_LOG_FORMAT",
    "CONFLUENCE_BASE_URL",
    "CONFLUENCE_USERNAME",
    "CONFLUENCE_API_TOKEN",
    "CONFLUENCE_BEARER_TOKEN",
    "CONFLUENCE_REQUEST_TIMEOUT_SECS",
    "CONFLUENCE_TOOL_TIMEOUT_SECS",
    "RUST_LOG",
];

/// The server binary with a clean environment, so the host's settings never leak into a test.
pub fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_confluence-mcp"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Spawn the server on the HTTP transport, pointed at `base_url`.
pub fn spawn_http_server(base_url: &str, port: u16, extra: &[&str]) -> anyhow::Result<Child> {
    server_command()
        .arg("--transport")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--base-url")
        .arg(base_url)
        .arg("--log-level")
        .arg("info")
        .args(extra)
        .stdout(Stdio::null())
        .spawn()
        .context("spawn confluence-mcp")
}
