use std::sync::Arc;

use serde_json::Value;

use crate::clients::{CurrentUser, WorkspaceClient};
use crate::protocol::{tool_outcome, ToolError, ToolResult};
use crate::registry::{json_schema_object, Tool, ToolDefinition};

pub const FAILURE_MESSAGE: &str = "Failed to retrieve user information";

/// Handle a `get_current_user` tool call.
///
/// Any workspace failure (missing credentials, HTTP error, transport) is
/// folded into the error payload.
pub async fn handle(client: &dyn WorkspaceClient) -> Result<CurrentUser, ToolError> {
    client.current_user().await.map_err(|e| {
        tracing::warn!(error = %e, "current user lookup failed");
        ToolError::new(e.to_string(), FAILURE_MESSAGE)
    })
}

pub struct CurrentUserTool {
    client: Arc<dyn WorkspaceClient>,
}

impl CurrentUserTool {
    pub fn new(client: Arc<dyn WorkspaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CurrentUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_user".into(),
            description: "Get information about the current authenticated user. \
                          Returns display_name, user_name and active for the end user \
                          making the request."
                .into(),
            input_schema: json_schema_object(serde_json::json!({}), &[]),
        }
    }

    async fn call(&self, _arguments: Value) -> ToolResult {
        tool_outcome(handle(self.client.as_ref()).await)
    }
}
