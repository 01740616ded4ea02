use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::ToolResult;
use crate::registry::{json_schema_object, Tool, ToolDefinition};

pub const HEALTHY_MESSAGE: &str = "Custom MCP Server is healthy and connected to Databricks Apps.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Liveness signal. Constant; never fails.
pub fn handle() -> HealthStatus {
    HealthStatus {
        status: "healthy".into(),
        message: HEALTHY_MESSAGE.into(),
    }
}

pub struct HealthTool;

#[async_trait::async_trait]
impl Tool for HealthTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "health".into(),
            description: "Check the health of the MCP server and Databricks connection. \
                          Useful for monitoring and for verifying the server is responsive."
                .into(),
            input_schema: json_schema_object(serde_json::json!({}), &[]),
        }
    }

    async fn call(&self, _arguments: Value) -> ToolResult {
        ToolResult::json(&handle())
    }
}
