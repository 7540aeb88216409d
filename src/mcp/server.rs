//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::fmp::client::FmpClient;
use crate::mcp::prompts::PromptHandler;
use crate::mcp::resources::ResourceHandler;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
const SERVER_NAME: &str = "fmp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for FMP financial data
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Resource handler
    resource_handler: ResourceHandler,

    /// Prompt handler
    prompt_handler: PromptHandler,

    /// Whether initialized
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(fmp_client: Arc<FmpClient>) -> Self {
        Self {
            tool_handler: ToolHandler::new(fmp_client.clone()),
            resource_handler: ResourceHandler::new(fmp_client),
            prompt_handler: PromptHandler::new(),
            initialized: false,
        }
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        let reader = stdin.lock();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_message(&line).await {
                Ok(Some(response)) => {
                    let response_str = serde_json::to_string(&response)?;
                    writeln!(stdout, "{}", response_str)?;
                    stdout.flush()?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    tracing::error!("Error handling message: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    async fn handle_message(&mut self, message: &str) -> Result<Option<JsonRpcResponse>> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                return Ok(Some(JsonRpcResponse::error(
                    RequestId::Number(0),
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = self.handle_initialize(&request).await?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::INITIALIZED => {
                self.initialized = true;
                Ok(None) // Notification, no response
            }
            methods::PING => Ok(Some(JsonRpcResponse::success(
                request.id,
                serde_json::json!({}),
            ))),
            methods::LIST_TOOLS => {
                let result = serde_json::to_value(ListToolsResult {
                    tools: self.tool_handler.list_tools(),
                })?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::CALL_TOOL => {
                let result = self.handle_call_tool(&request).await;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::LIST_RESOURCES => {
                let result = serde_json::to_value(ListResourcesResult {
                    resources: self.resource_handler.list_resources(),
                })?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::LIST_RESOURCE_TEMPLATES => {
                let result = serde_json::to_value(ListResourceTemplatesResult {
                    resource_templates: self.resource_handler.list_templates(),
                })?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::READ_RESOURCE => Ok(Some(self.handle_read_resource(request).await?)),
            methods::LIST_PROMPTS => {
                let result = serde_json::to_value(ListPromptsResult {
                    prompts: self.prompt_handler.list_prompts(),
                })?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::GET_PROMPT => Ok(Some(self.handle_get_prompt(request)?)),
            _ => Ok(Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            ))),
        }
    }

    /// Handle initialize request
    async fn handle_initialize(&self, _request: &JsonRpcRequest) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
                resources: Some(ResourcesCapability::default()),
                prompts: Some(PromptsCapability::default()),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> Value {
        let params: CallToolParams = match request.params.as_ref() {
            Some(p) => match serde_json::from_value(p.clone()) {
                Ok(params) => params,
                Err(e) => {
                    return serde_json::to_value(CallToolResult::error(format!(
                        "Invalid tool parameters: {}",
                        e
                    )))
                    .unwrap_or_default();
                }
            },
            None => {
                return serde_json::to_value(CallToolResult::error("Missing tool parameters"))
                    .unwrap_or_default();
            }
        };

        let result = self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await;
        serde_json::to_value(result).unwrap_or_else(|e| {
            serde_json::to_value(CallToolResult::error(e.to_string())).unwrap_or_default()
        })
    }

    /// Handle read resource request
    async fn handle_read_resource(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params: ReadResourceParams = match request.params.as_ref() {
            Some(p) => match serde_json::from_value(p.clone()) {
                Ok(params) => params,
                Err(e) => {
                    return Ok(JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(e.to_string()),
                    ))
                }
            },
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing resource parameters"),
                ))
            }
        };

        match self.resource_handler.read(&params.uri).await {
            Ok(text) => {
                let result = serde_json::to_value(ReadResourceResult {
                    contents: vec![ResourceContent {
                        uri: params.uri,
                        text: Some(text),
                        mime_type: Some("text/markdown".to_string()),
                    }],
                })?;
                Ok(JsonRpcResponse::success(request.id, result))
            }
            Err(e) => Ok(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params(e.to_string()),
            )),
        }
    }

    /// Handle get prompt request
    fn handle_get_prompt(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params: GetPromptParams = match request.params.as_ref() {
            Some(p) => match serde_json::from_value(p.clone()) {
                Ok(params) => params,
                Err(e) => {
                    return Ok(JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(e.to_string()),
                    ))
                }
            },
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing prompt parameters"),
                ))
            }
        };

        match self.prompt_handler.get_prompt(&params.name, &params.arguments) {
            Ok(result) => Ok(JsonRpcResponse::success(
                request.id,
                serde_json::to_value(result)?,
            )),
            Err(e) => Ok(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params(e.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn server() -> McpServer {
        let config = Config::with_credentials("test-key", "http://127.0.0.1:1");
        McpServer::new(Arc::new(FmpClient::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_initialize_reports_all_capabilities() {
        let mut srv = server();
        let response = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap()
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "fmp");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["resources"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_response() {
        let mut srv = server();
        let response = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"notifications/initialized"}"#)
            .await
            .unwrap();
        assert!(response.is_none());
        assert!(srv.initialized);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut srv = server();
        let response = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"tools/destroy"}"#)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_list_tools_and_prompts() {
        let mut srv = server();

        let tools = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":4,"method":"tools/list"}"#)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tools.result.unwrap()["tools"].as_array().unwrap().len(), 16);

        let prompts = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":5,"method":"prompts/list"}"#)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            prompts.result.unwrap()["prompts"].as_array().unwrap().len(),
            7
        );
    }

    #[tokio::test]
    async fn test_get_prompt_via_protocol() {
        let mut srv = server();
        let response = srv
            .handle_message(
                r#"{"jsonrpc":"2.0","id":6,"method":"prompts/get","params":{"name":"company_analysis","arguments":{"symbol":"AAPL"}}}"#,
            )
            .await
            .unwrap()
            .unwrap();

        let result = response.result.unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("AAPL"));
    }

    #[tokio::test]
    async fn test_read_unknown_resource_is_invalid_params() {
        let mut srv = server();
        let response = srv
            .handle_message(
                r#"{"jsonrpc":"2.0","id":7,"method":"resources/read","params":{"uri":"bogus://x"}}"#,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_parse_error_response() {
        let mut srv = server();
        let response = srv.handle_message("{not json").await.unwrap().unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
    }
}
