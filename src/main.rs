use std::sync::Arc;

use databricks_agent_mcp::clients::{EnvTokenProvider, HttpWorkspaceClient, ServingClient};
use databricks_agent_mcp::config::ServerConfig;
use databricks_agent_mcp::handlers::{self, Services};
use databricks_agent_mcp::registry::ToolRegistry;
use databricks_agent_mcp::server::McpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    if config.databricks_host.is_none() {
        tracing::warn!("DATABRICKS_HOST is not set; ask_agent will report a configuration error");
    }
    if config.agent_endpoint_name.is_none() {
        tracing::warn!("AGENT_ENDPOINT_NAME is not set; ask_agent will report a configuration error");
    }

    let tokens = Arc::new(EnvTokenProvider::from_env());
    let workspace = match HttpWorkspaceClient::new(config.databricks_host.as_deref(), tokens.clone()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("cannot build workspace client: {e}");
            std::process::exit(1);
        }
    };
    let responses = match ServingClient::new() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("cannot build serving client: {e}");
            std::process::exit(1);
        }
    };

    let mut registry = ToolRegistry::new(config.tool_timeout);
    handlers::load_tools(
        &mut registry,
        config,
        Services {
            tokens,
            workspace,
            responses,
        },
    );

    let mut server = McpServer::new(registry);
    if let Err(e) = server.run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}
