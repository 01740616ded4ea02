pub mod request;
pub mod response;

pub use request::{
    AskAgentParams, ClientInfo, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams,
};
pub use response::{
    tool_outcome, ErrorDebug, JsonRpcError, JsonRpcResponse, ToolError, ToolResult,
    ToolResultContent,
};
