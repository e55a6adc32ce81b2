//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use kwscout_core::Config;

use crate::server::KeywordServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve MCP requests on stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = KeywordServer::new(config, max_input);
    info!("starting MCP server on stdio");

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP service")?;
    service.waiting().await.context("MCP service failed")?;

    info!("MCP client disconnected");
    Ok(())
}
