//! MCP server command.

use tracing::info;

use crate::mcp::server::run_mcp_server;
use testforge_rs::core::config::TestforgeConfig;

/// Serve testforge tools over stdio until stdin closes
pub async fn mcp_stdio_command(config: TestforgeConfig) -> anyhow::Result<()> {
    info!("Starting testforge MCP server on stdio");
    run_mcp_server(config).await
}
