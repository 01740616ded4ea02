use std::time::Duration;

/// Default timeout for a single tool call (120 seconds).
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;

/// Description advertised for `ask_agent` when `AGENT_DESCRIPTION` is unset.
pub const DEFAULT_AGENT_DESCRIPTION: &str = "Ask questions to the AI agent";

/// Path segment under which Databricks exposes model serving endpoints.
const SERVING_ENDPOINTS_PATH: &str = "/serving-endpoints";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AGENT_MCP_TOOL_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Server configuration loaded from environment variables.
///
/// Host and endpoint name are optional at load time: their absence is only
/// reported when `ask_agent` is called, so `health` and `get_current_user`
/// keep working on a partially configured deployment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub databricks_host: Option<String>,
    pub agent_endpoint_name: Option<String>,
    pub agent_description: String,
    pub tool_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// - `DATABRICKS_HOST` — workspace hostname, scheme optional
    /// - `AGENT_ENDPOINT_NAME` — serving endpoint queried by `ask_agent`
    /// - `AGENT_DESCRIPTION` (optional) — description advertised for `ask_agent`
    /// - `AGENT_MCP_TOOL_TIMEOUT_SECS` (optional, default 120) — max seconds per tool call
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tool_timeout_secs = match non_empty("AGENT_MCP_TOOL_TIMEOUT_SECS") {
            Some(val) => match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(val)),
            },
            None => DEFAULT_TOOL_TIMEOUT_SECS,
        };

        Ok(Self {
            databricks_host: non_empty("DATABRICKS_HOST"),
            agent_endpoint_name: non_empty("AGENT_ENDPOINT_NAME"),
            agent_description: lookup("AGENT_DESCRIPTION")
                .unwrap_or_else(|| DEFAULT_AGENT_DESCRIPTION.to_string()),
            tool_timeout: Duration::from_secs(tool_timeout_secs),
        })
    }

    /// Serving endpoints base URL for the configured host, if any.
    pub fn serving_base_url(&self) -> Option<String> {
        self.databricks_host.as_deref().map(serving_base_url)
    }
}

/// Prefix `https://` unless already present.
pub fn https_host(host: &str) -> String {
    if host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Fully qualified serving endpoints base URL for a workspace host.
///
/// `example.com` and `https://example.com` both map to
/// `https://example.com/serving-endpoints`.
pub fn serving_base_url(host: &str) -> String {
    format!("{}{SERVING_ENDPOINTS_PATH}", https_host(host))
}
