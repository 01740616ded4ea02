use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::protocol::{ToolError, ToolResult};
use crate::schema::validate_value;

/// Tool metadata advertised through `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A callable exposed to MCP clients.
///
/// Implementations contain their own failures: `call` always yields a
/// tool result, never a protocol error.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, arguments: Value) -> ToolResult;
}

struct Registered {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

/// Tools known to the server, kept in registration order.
pub struct ToolRegistry {
    tools: Vec<Registered>,
    call_timeout: Duration,
}

impl ToolRegistry {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            tools: Vec::new(),
            call_timeout,
        }
    }

    /// Register a tool. The definition is captured now; re-registering a
    /// name replaces the earlier tool in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let definition = tool.definition();
        tracing::debug!(tool = %definition.name, "registering tool");

        let entry = Registered { definition, tool };
        match self
            .tools
            .iter_mut()
            .find(|r| r.definition.name == entry.definition.name)
        {
            Some(existing) => *existing = entry,
            None => self.tools.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|r| r.definition.clone()).collect()
    }

    /// Invoke a tool by name.
    ///
    /// Missing arguments are treated as `{}`. Arguments are checked against
    /// the tool's input schema before the tool runs.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        let Some(entry) = self.tools.iter().find(|r| r.definition.name == name) else {
            tracing::warn!(tool = name, "unknown tool");
            return ToolResult::error(format!("Unknown tool: {name}"));
        };

        let arguments = arguments.unwrap_or_else(|| Value::Object(Default::default()));
        if let Err(e) = validate_value(&entry.definition.input_schema, &arguments) {
            tracing::warn!(tool = name, error = %e, "rejected tool arguments");
            return ToolResult::error(format!("Invalid arguments for {name}: {e}"));
        }

        tracing::info!(tool = name, "tool call");
        match tokio::time::timeout(self.call_timeout, entry.tool.call(arguments)).await {
            Ok(result) => result,
            Err(_) => {
                let secs = self.call_timeout.as_secs();
                tracing::warn!(tool = name, timeout_secs = secs, "tool call timed out");
                ToolError::new(
                    "Tool call timed out",
                    format!("'{name}' did not complete within {secs} seconds"),
                )
                .into()
            }
        }
    }
}

// Helpers for building input schemas.

pub fn json_schema_object(properties: Value, required: &[&str]) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}
