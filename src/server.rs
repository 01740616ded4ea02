use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::registry::ToolRegistry;

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

type ServeError = Box<dyn std::error::Error>;

/// MCP server speaking newline-delimited JSON-RPC 2.0.
pub struct McpServer {
    registry: ToolRegistry,
    initialized: bool,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            initialized: false,
        }
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<(), ServeError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        if self.registry.is_empty() {
            tracing::warn!("no tools registered");
        }
        tracing::info!(tools = self.registry.len(), "serving MCP over stdio");
        self.serve(reader, writer).await
    }

    /// Serve one message per line from `reader`, answering on `writer`.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = (&mut reader)
                .take(MAX_MESSAGE_BYTES as u64 + 1)
                .read_until(b'\n', &mut raw)
                .await?;
            if n == 0 {
                tracing::info!("input closed, shutting down");
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                tracing::warn!(limit = MAX_MESSAGE_BYTES, "message too large");
                if raw.last() != Some(&b'\n') {
                    discard_line(&mut reader).await?;
                }
                write_response(
                    &mut writer,
                    &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                )
                .await?;
                continue;
            }

            let req = match decode(&raw) {
                Decoded::Request(req) => req,
                Decoded::Blank => continue,
                Decoded::Reject(resp) => {
                    write_response(&mut writer, &resp).await?;
                    continue;
                }
            };

            if let Some(resp) = self.handle(&req).await {
                write_response(&mut writer, &resp).await?;
            }
        }

        Ok(())
    }

    async fn handle(&mut self, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request(),
            ));
        }

        // Only `initialize` is accepted before the handshake; notifications
        // sent too early are dropped.
        if !self.initialized && req.method != "initialize" {
            return req.id.as_ref().map(|id| {
                JsonRpcResponse::error(
                    Some(id.clone()),
                    JsonRpcError::invalid_request_with("Server not initialized"),
                )
            });
        }

        tracing::debug!(method = %req.method, "request");
        let resp = handlers::dispatch(req, &self.registry).await;

        if req.method == "initialize" {
            self.initialized = true;
        }
        resp
    }
}

enum Decoded {
    Request(JsonRpcRequest),
    Blank,
    Reject(JsonRpcResponse),
}

fn decode(raw: &[u8]) -> Decoded {
    let parse_error = || Decoded::Reject(JsonRpcResponse::error(None, JsonRpcError::parse_error()));

    let Ok(text) = std::str::from_utf8(raw) else {
        tracing::warn!("message is not valid UTF-8");
        return parse_error();
    };
    let text = text.trim();
    if text.is_empty() {
        return Decoded::Blank;
    }

    match serde_json::from_str(text) {
        Ok(req) => Decoded::Request(req),
        Err(e) => {
            tracing::warn!(error = %e, "parse error");
            parse_error()
        }
    }
}

/// Skip the remainder of an oversized line without buffering it.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), ServeError> {
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
