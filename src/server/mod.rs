//! MCP stdio server
//!
//! Reads one JSON-RPC message per line from stdin and writes responses to
//! stdout. Each message is handled on its own task so a slow ArgoCD call
//! never blocks `ping` or other tool calls; responses may therefore arrive
//! out of order and are matched by `id`.

pub mod protocol;

use std::sync::Arc;

use log::{debug, error, info};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::tools;
use protocol::{
    INVALID_PARAMS, INVALID_REQUEST, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolResult, ToolsCapability,
};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "argocd-mcp";

/// MCP server exposing the ArgoCD tools
pub struct McpServer {
    executor: RequestExecutor,
}

impl McpServer {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Serve stdin until EOF, then wait for in-flight calls to finish
    pub async fn run(self) -> Result<()> {
        let server = Arc::new(self);
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                stdout.write_all(line.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        info!("MCP server ready, listening on stdio");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let server = Arc::clone(&server);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_message(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(json) => {
                        // Writer only stops once every sender is gone
                        let _ = tx.send(json);
                    }
                    Err(err) => error!("Failed to serialize response: {}", err),
                }
            });
        }

        // Writer drains until the last task drops its sender
        drop(tx);
        writer
            .await
            .map_err(|err| Error::Other(format!("stdout writer failed: {}", err)))??;

        info!("stdin closed, MCP server exiting");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(message) {
            Ok(raw) => raw,
            Err(err) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", err),
                ));
            }
        };

        let id_hint = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(err) => {
                return Some(JsonRpcResponse::error(
                    id_hint,
                    INVALID_REQUEST,
                    format!("Invalid Request: {}", err),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            return None;
        };

        debug!("Request {}: {}", id, request.method);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => {
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
        };

        match serde_json::to_value(result) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, INVALID_REQUEST, err.to_string()),
        }
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        match serde_json::to_value(tools::definitions()) {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(err) => JsonRpcResponse::error(id, INVALID_REQUEST, err.to_string()),
        }
    }

    async fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(err) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", err),
                );
            }
        };

        info!("Calling tool {}", params.name);
        let payload = tools::call_tool(&self.executor, &params.name, params.arguments).await;

        match serde_json::to_value(ToolResult::from_payload(&payload)) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, INVALID_PARAMS, err.to_string()),
        }
    }
}
