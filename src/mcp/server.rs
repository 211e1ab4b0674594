// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Stdio request loop and method dispatch.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::protocol::{
    error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION,
    PROTOCOL_VERSION,
};
use crate::search::{TokenizationPolicy, WhitespaceHeuristic};
use crate::service::NrtsearchService;
use crate::tools::{self, ToolError};

pub const SERVER_NAME: &str = "nrtsearch-mcp";

#[derive(Error, Debug)]
pub enum McpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct McpServer<P = WhitespaceHeuristic> {
    service: NrtsearchService<P>,
}

impl<P: TokenizationPolicy> McpServer<P> {
    pub fn new(service: NrtsearchService<P>) -> Self {
        Self { service }
    }

    /// Serve until the reader hits EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server ready on stdio");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            debug!(request = %line, "Received");

            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut out = serde_json::to_string(&response)?;
            debug!(response = %out, "Sending");
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one input line. Returns `None` for notifications.
    ///
    /// A message without an `id` member is a notification; `"id": null` is a
    /// request and gets a response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let is_notification = message.get("id").is_none();
        let request: JsonRpcRequest = match serde_json::from_value(message.clone()) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Invalid request");
                let id = message
                    .get("id")
                    .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        if is_notification {
            debug!(method = %request.method, "Notification");
            return None;
        }

        Some(self.dispatch(request).await)
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id;
        match request.method.as_str() {
            methods::INITIALIZE => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            ),
            methods::PING => JsonRpcResponse::success(id, json!({})),
            methods::TOOLS_LIST => JsonRpcResponse::success(
                id,
                json!({ "tools": tools::tool_definitions() }),
            ),
            methods::TOOLS_CALL => {
                let params = request.params.unwrap_or(Value::Null);
                let params: ToolCallParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            id,
                            error_codes::INVALID_PARAMS,
                            format!("Invalid tools/call params: {}", e),
                        )
                    }
                };
                self.call_tool(id, params).await
            }
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    async fn call_tool(&self, id: Option<JsonRpcId>, params: ToolCallParams) -> JsonRpcResponse {
        match tools::call_tool(&self.service, &params.name, params.arguments).await {
            Ok(value) => match tools::result_text(&value) {
                Ok(text) => JsonRpcResponse::success(id, tool_result(text, false)),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("Failed to encode tool result: {}", e),
                ),
            },
            Err(e @ ToolError::UnknownTool(_)) => {
                JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, e.to_string())
            }
            Err(e) => JsonRpcResponse::success(id, tool_result(e.to_string(), true)),
        }
    }
}

fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error,
    })
}
