pub mod ask_agent;
pub mod current_user;
pub mod health;

use std::sync::Arc;

use crate::clients::{ResponsesApi, TokenProvider, WorkspaceClient};
use crate::config::ServerConfig;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams,
};
use crate::registry::ToolRegistry;

/// External collaborators shared by the tools.
#[derive(Clone)]
pub struct Services {
    pub tokens: Arc<dyn TokenProvider>,
    pub workspace: Arc<dyn WorkspaceClient>,
    pub responses: Arc<dyn ResponsesApi>,
}

/// Register every tool with the registry, in order: `health`,
/// `get_current_user`, `ask_agent`.
///
/// The `ask_agent` description is built here from
/// [`ServerConfig::agent_description`].
pub fn load_tools(registry: &mut ToolRegistry, config: Arc<ServerConfig>, services: Services) {
    registry.register(Arc::new(health::HealthTool));
    registry.register(Arc::new(current_user::CurrentUserTool::new(services.workspace)));
    registry.register(Arc::new(ask_agent::AskAgentTool::new(
        config,
        services.tokens,
        services.responses,
    )));
    tracing::info!(tools = registry.len(), "tools registered");
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, registry: &ToolRegistry) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let params = req
                .params
                .clone()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok());
            if let Some(params) = params {
                let client = params.client_info.as_ref();
                tracing::info!(
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
                    protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
                    "client initializing"
                );
            }

            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "databricks-agent-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": registry.definitions() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let tool_result = registry.call(&params.name, params.arguments).await;
            match serde_json::to_value(&tool_result) {
                Ok(result) => Some(JsonRpcResponse::success(req.id.clone(), result)),
                Err(e) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Cannot encode tool result: {e}")),
                )),
            }
        }

        // Other notifications are ignored.
        _ if req.id.is_none() => None,

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}
