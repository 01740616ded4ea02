use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::USER_AGENT;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Non-2xx reply. The status code is part of the message so callers
    /// can classify on it.
    #[error("Error code: {status} - {body}")]
    Status { status: u16, body: String },

    /// Request never completed. Stored without its URL.
    #[error("Connection error: {0}")]
    Transport(reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

/// A single Responses API call.
#[derive(Debug, Clone, Copy)]
pub struct AgentRequest<'a> {
    /// Serving endpoints base URL, e.g. `https://host/serving-endpoints`.
    pub base_url: &'a str,
    pub token: &'a str,
    /// Serving endpoint name, passed as the model.
    pub model: &'a str,
    pub prompt: &'a str,
}

/// A list element that either has the expected shape or is kept verbatim.
///
/// Lets one malformed item sit next to well-formed siblings without failing
/// the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    Expected(T),
    Unexpected(Value),
}

impl<T> Shaped<T> {
    pub fn expected(&self) -> Option<&T> {
        match self {
            Self::Expected(item) => Some(item),
            Self::Unexpected(_) => None,
        }
    }
}

/// Responses API reply.
///
/// Every level is optional and unknown fields are kept, so a body that does
/// not carry text can still be re-serialized verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<Shaped<OutputItem>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Shaped<ContentItem>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseBody {
    /// Interpret an arbitrary JSON reply.
    ///
    /// Off-shape output or content items are kept as [`Shaped::Unexpected`].
    /// A body whose `output` is not a list at all is kept as opaque fields
    /// with no output items rather than rejected.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(body) => body,
            Err(_) => {
                let extra = match value {
                    Value::Object(map) => map,
                    other => {
                        let mut map = Map::new();
                        map.insert("body".to_string(), other);
                        map
                    }
                };
                Self { output: None, extra }
            }
        }
    }

    /// Compact JSON rendering of the whole reply.
    pub fn to_raw_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable response: {e}>"))
    }
}

/// OpenAI-compatible Responses API.
#[async_trait::async_trait]
pub trait ResponsesApi: Send + Sync {
    async fn create(&self, request: AgentRequest<'_>) -> Result<ResponseBody, AgentError>;
}

#[derive(Debug, Serialize)]
struct CreateResponse<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Responses API client for Databricks serving endpoints.
///
/// No request timeout is set here; calls are bounded by the server's
/// per-tool timeout.
#[derive(Debug, Clone)]
pub struct ServingClient {
    http: reqwest::Client,
}

impl ServingClient {
    pub fn new() -> Result<Self, AgentError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl ResponsesApi for ServingClient {
    async fn create(&self, request: AgentRequest<'_>) -> Result<ResponseBody, AgentError> {
        let url = format!("{}/responses", request.base_url.trim_end_matches('/'));
        tracing::debug!(url = %url, model = request.model, "POST responses");

        let body = CreateResponse {
            model: request.model,
            input: [InputMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(request.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(ResponseBody::from_value(value))
    }
}
