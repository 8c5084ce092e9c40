//! Serve command implementation

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::server::McpServer;

/// Run the MCP server until stdin closes
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    log::info!(
        "Starting argocd-mcp {} against {}",
        env!("CARGO_PKG_VERSION"),
        ctx.config.api_url
    );
    McpServer::new(ctx.executor).run().await
}
