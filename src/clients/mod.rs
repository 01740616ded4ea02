//! External collaborators the tools delegate to.
//!
//! Each collaborator sits behind a trait so handlers can be exercised
//! against in-process fakes; the concrete types talk to a Databricks
//! workspace over HTTPS.

pub mod serving;
pub mod token;
pub mod workspace;

pub use serving::{
    AgentError, AgentRequest, ContentItem, OutputItem, ResponseBody, ResponsesApi, ServingClient,
    Shaped,
};
pub use token::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
pub use workspace::{CurrentUser, HttpWorkspaceClient, WorkspaceClient, WorkspaceError};

/// User agent sent on every outbound request.
pub(crate) const USER_AGENT: &str = concat!("databricks-agent-mcp/", env!("CARGO_PKG_VERSION"));
