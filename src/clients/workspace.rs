use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::token::TokenProvider;
use super::USER_AGENT;
use crate::config::https_host;

/// SCIM endpoint describing the authenticated caller.
const CURRENT_USER_PATH: &str = "/api/2.0/preview/scim/v2/Me";

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("DATABRICKS_HOST is not configured")]
    MissingHost,

    #[error("No credentials available for the workspace client")]
    MissingToken,

    #[error("Error code: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Connection error: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for WorkspaceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

/// Profile of the caller as seen by the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub display_name: Option<String>,
    pub user_name: Option<String>,
    pub active: Option<bool>,
}

/// "Who am I" lookup against an authenticated workspace.
#[async_trait::async_trait]
pub trait WorkspaceClient: Send + Sync {
    async fn current_user(&self) -> Result<CurrentUser, WorkspaceError>;
}

#[derive(Debug, Deserialize)]
struct ScimUser {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "userName")]
    user_name: Option<String>,
    active: Option<bool>,
}

impl From<ScimUser> for CurrentUser {
    fn from(user: ScimUser) -> Self {
        Self {
            display_name: user.display_name,
            user_name: user.user_name,
            active: user.active,
        }
    }
}

/// Workspace client authenticated with the caller's delegated token.
pub struct HttpWorkspaceClient {
    base_url: Option<String>,
    tokens: Arc<dyn TokenProvider>,
    http: reqwest::Client,
}

impl HttpWorkspaceClient {
    /// Client for a workspace host; `https://` is added when missing.
    pub fn new(
        host: Option<&str>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, WorkspaceError> {
        Self::with_base_url(host.map(https_host), tokens)
    }

    /// Client for an already fully qualified workspace URL.
    pub fn with_base_url(
        base_url: Option<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, WorkspaceError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            tokens,
            http,
        })
    }
}

#[async_trait::async_trait]
impl WorkspaceClient for HttpWorkspaceClient {
    async fn current_user(&self) -> Result<CurrentUser, WorkspaceError> {
        let base_url = self.base_url.as_deref().ok_or(WorkspaceError::MissingHost)?;
        let token = self.tokens.user_token().ok_or(WorkspaceError::MissingToken)?;

        let url = format!("{base_url}{CURRENT_USER_PATH}");
        tracing::debug!(url = %url, "GET current user");

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkspaceError::Status { status: status.as_u16(), body });
        }

        let user: ScimUser = response.json().await?;
        Ok(user.into())
    }
}
