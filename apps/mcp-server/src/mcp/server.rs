//! MCP Server core implementation
//!
//! Request dispatch lives here so the stdio and HTTP transports share it.

use serde_json::json;

use super::protocol::*;
use super::{resources, tools};
use crate::config::ConverterConfig;

const INSTRUCTIONS: &str = "Converts Markdown to right-to-left Hebrew Word documents. \
Call list_templates first, then convert_markdown_to_rtl_docx or \
convert_markdown_file_to_rtl_docx with one of the returned template ids.";

/// The RTL DOCX MCP Server
#[derive(Debug, Clone)]
pub struct RtlDocxMcpServer {
    /// Server name
    name: String,
    /// Server version
    version: String,
    /// Conversion settings shared by every tool call
    config: ConverterConfig,
}

impl RtlDocxMcpServer {
    /// Create a server with the given conversion settings
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            name: "markdown-to-docx".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
        }
    }

    /// Get server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get server version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get conversion settings
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Handle one JSON-RPC message. Notifications yield `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(id, json!({ "tools": tools::get_tool_definitions() }))
            }
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "resources/list" => JsonRpcResponse::success(
                id,
                json!({ "resources": resources::get_resource_definitions(&self.config) }),
            ),
            "resources/templates/list" => JsonRpcResponse::success(
                id,
                json!({ "resourceTemplates": resources::get_resource_templates() }),
            ),
            "resources/read" => self.handle_read_resource(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: self.version.clone(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(
        &self,
        id: Option<serde_json::Value>,
        params: serde_json::Value,
    ) -> JsonRpcResponse {
        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match tools::handle_tool_call(name, arguments, &self.config).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": content,
                    "isError": false
                }),
            ),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": format!("Error: {}", e)}],
                        "isError": true
                    }),
                )
            }
        }
    }

    fn handle_read_resource(
        &self,
        id: Option<serde_json::Value>,
        params: serde_json::Value,
    ) -> JsonRpcResponse {
        let uri = params.get("uri").and_then(|v| v.as_str()).unwrap_or("");

        match resources::read_resource(uri, &self.config) {
            Ok(content) => JsonRpcResponse::success(id, json!({ "contents": [content] })),
            Err(e) => JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
        }
    }
}
