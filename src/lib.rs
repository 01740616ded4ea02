//! MCP server exposing Databricks tools to AI assistants.
//!
//! Registers `health`, `get_current_user` and `ask_agent` and serves them
//! over JSON-RPC 2.0 stdio transport. `ask_agent` forwards a prompt to an
//! agent hosted on a Databricks serving endpoint through its
//! OpenAI-compatible Responses API, authenticated with the caller's
//! delegated token.

pub mod clients;
pub mod config;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;

pub mod schema;
