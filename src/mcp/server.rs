use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpError, Resource,
    ResourceReadParams, Tool, ToolCallParams, PROTOCOL_VERSION,
};

#[async_trait]
pub trait McpHandler: Send + Sync {
    async fn initialize(&self, params: InitializeParams) -> Result<serde_json::Value, McpError>;
    async fn list_tools(&self) -> Result<Vec<Tool>, McpError>;
    async fn call_tool(&self, params: ToolCallParams) -> Result<serde_json::Value, McpError>;
    async fn list_resources(&self) -> Result<Vec<Resource>, McpError>;
    async fn read_resource(&self, params: ResourceReadParams) -> Result<serde_json::Value, McpError>;
}

/// Line-delimited JSON-RPC server. One request is handled at a time.
#[derive(Default)]
pub struct McpServer {
    handlers: BTreeMap<String, Arc<dyn McpHandler>>,
}

impl McpServer {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn add_handler(&mut self, name: impl Into<String>, handler: Arc<dyn McpHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub async fn run_stdio(&self) -> Result<(), McpError> {
        info!("MCP Server running on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Read requests line by line until EOF, writing one response per request.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                break; // EOF
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.process_line(&line).await else {
                continue;
            };

            let response_str = serde_json::to_string(&response)?;
            writer.write_all(response_str.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("MCP Server input closed");
        Ok(())
    }

    /// Handle one raw request line. Notifications produce no response.
    pub async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line.trim()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                return Some(JsonRpcResponse::failure(
                    JsonRpcError {
                        code: -32700,
                        message: format!("Parse error: {}", e),
                        data: None,
                    },
                    None,
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        Some(self.process_request(request).await)
    }

    pub async fn process_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "Request received");

        let id = request.id.clone();
        match self.dispatch(request).await {
            Ok(result) => JsonRpcResponse::success(result, id),
            Err(e) => {
                error!("Error processing request: {}", e);
                JsonRpcResponse::failure(e.into(), id)
            }
        }
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Result<serde_json::Value, McpError> {
        let params = request.params.unwrap_or_default();

        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = if params.is_null() {
                    InitializeParams::default()
                } else {
                    serde_json::from_value(params)
                        .map_err(|e| McpError::InvalidParams(e.to_string()))?
                };
                match self.handlers.values().next() {
                    Some(handler) => handler.initialize(params).await,
                    None => Ok(serde_json::json!({
                        "protocolVersion": PROTOCOL_VERSION,
                        "capabilities": {},
                    })),
                }
            }
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => {
                let mut tools = Vec::new();
                for handler in self.handlers.values() {
                    tools.extend(handler.list_tools().await?);
                }
                Ok(serde_json::json!({ "tools": tools }))
            }
            "tools/call" => {
                let params: ToolCallParams = serde_json::from_value(params)
                    .map_err(|e| McpError::InvalidParams(e.to_string()))?;
                let handler = self.handler_for_tool(&params.name).await?;
                handler.call_tool(params).await
            }
            "resources/list" => {
                let mut resources = Vec::new();
                for handler in self.handlers.values() {
                    resources.extend(handler.list_resources().await?);
                }
                Ok(serde_json::json!({ "resources": resources }))
            }
            "resources/read" => {
                let params: ResourceReadParams = serde_json::from_value(params)
                    .map_err(|e| McpError::InvalidParams(e.to_string()))?;
                let handler = self.handler_for_resource(&params.uri).await?;
                handler.read_resource(params).await
            }
            _ => Err(McpError::MethodNotFound(request.method)),
        }
    }

    async fn handler_for_tool(&self, name: &str) -> Result<&Arc<dyn McpHandler>, McpError> {
        for handler in self.handlers.values() {
            if handler.list_tools().await?.iter().any(|t| t.name == name) {
                return Ok(handler);
            }
        }
        Err(McpError::ToolNotFound(name.to_string()))
    }

    async fn handler_for_resource(&self, uri: &str) -> Result<&Arc<dyn McpHandler>, McpError> {
        for handler in self.handlers.values() {
            if handler.list_resources().await?.iter().any(|r| r.uri == uri) {
                return Ok(handler);
            }
        }
        Err(McpError::ResourceNotFound(uri.to_string()))
    }
}
