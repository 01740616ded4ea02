use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{
    AgentError, AgentRequest, ResponseBody, ResponsesApi, Shaped, TokenProvider,
};
use crate::config::ServerConfig;
use crate::protocol::{tool_outcome, AskAgentParams, ErrorDebug, ToolError, ToolResult};
use crate::registry::{json_schema_object, json_schema_string, Tool, ToolDefinition};

pub const NO_TEXT_NOTE: &str = "Could not extract text from response";

/// Successful `ask_agent` payload.
///
/// `note` is only set when no text could be extracted and `response` holds
/// the raw reply instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Handle an `ask_agent` tool call.
///
/// Token and configuration are checked before any network call. Exactly one
/// Responses API request is made otherwise; there are no retries.
pub async fn handle(
    prompt: &str,
    config: &ServerConfig,
    tokens: &dyn TokenProvider,
    api: &dyn ResponsesApi,
) -> Result<AgentReply, ToolError> {
    let Some(token) = tokens.user_token() else {
        return Err(ToolError::new(
            "No OBO token available",
            "This tool requires OBO authentication. Running locally without token.",
        ));
    };

    let Some(base_url) = config.serving_base_url() else {
        return Err(ToolError::new(
            "DATABRICKS_HOST not configured",
            "The DATABRICKS_HOST environment variable is not set. \
             This should be automatic in Databricks Apps.",
        ));
    };
    let Some(endpoint) = config.agent_endpoint_name.as_deref() else {
        return Err(ToolError::new(
            "AGENT_ENDPOINT_NAME not configured",
            "The AGENT_ENDPOINT_NAME environment variable is not set.",
        ));
    };

    let request = AgentRequest {
        base_url: &base_url,
        token: &token,
        model: endpoint,
        prompt,
    };

    match api.create(request).await {
        Ok(body) => Ok(reply_from(&body)),
        Err(e) => {
            tracing::warn!(endpoint, base_url = %base_url, error = %e, "agent query failed");
            Err(classify_failure(&e, &base_url, endpoint))
        }
    }
}

/// Concatenate every non-empty `output[].content[].text`, space separated.
///
/// Returns `None` when the reply carries no text at all.
pub fn extract_text(body: &ResponseBody) -> Option<String> {
    let texts: Vec<&str> = body
        .output
        .iter()
        .flatten()
        .filter_map(Shaped::expected)
        .filter_map(|item| item.content.as_ref())
        .flatten()
        .filter_map(Shaped::expected)
        .filter_map(|content| content.text.as_deref())
        .filter(|text| !text.is_empty())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join(" ").trim().to_string())
    }
}

fn reply_from(body: &ResponseBody) -> AgentReply {
    match extract_text(body) {
        Some(response) => AgentReply { response, note: None },
        None => {
            tracing::warn!("agent reply carried no text, returning raw response");
            AgentReply {
                response: body.to_raw_string(),
                note: Some(NO_TEXT_NOTE.to_string()),
            }
        }
    }
}

fn classify_failure(err: &AgentError, base_url: &str, endpoint: &str) -> ToolError {
    let error = err.to_string();
    if error.contains("401") {
        return ToolError::new(
            error,
            "Authentication failed. Check that the App has serving scopes \
             and user has Can Query permission.",
        );
    }
    if error.contains("404") {
        return ToolError::new(
            error,
            format!("Endpoint '{endpoint}' not found or not accessible."),
        );
    }
    ToolError::new(error, "Failed to query the agent").with_debug(ErrorDebug {
        base_url: base_url.to_string(),
        endpoint: endpoint.to_string(),
    })
}

/// Advertised description: the operator-supplied text followed by the
/// argument documentation.
pub fn describe(agent_description: &str) -> String {
    format!(
        "{agent_description}\n\n\
         Args:\n    prompt: The question or message to send to the agent.\n\n\
         Returns:\n    The agent's response or an error message."
    )
}

pub struct AskAgentTool {
    config: Arc<ServerConfig>,
    tokens: Arc<dyn TokenProvider>,
    api: Arc<dyn ResponsesApi>,
    description: String,
}

impl AskAgentTool {
    pub fn new(
        config: Arc<ServerConfig>,
        tokens: Arc<dyn TokenProvider>,
        api: Arc<dyn ResponsesApi>,
    ) -> Self {
        let description = describe(&config.agent_description);
        Self {
            config,
            tokens,
            api,
            description,
        }
    }
}

#[async_trait::async_trait]
impl Tool for AskAgentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "ask_agent".into(),
            description: self.description.clone(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "prompt": json_schema_string("The question or message to send to the agent")
                }),
                &["prompt"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> ToolResult {
        let params: AskAgentParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid arguments for ask_agent: {e}")),
        };
        tool_outcome(
            handle(
                &params.prompt,
                &self.config,
                self.tokens.as_ref(),
                self.api.as_ref(),
            )
            .await,
        )
    }
}
