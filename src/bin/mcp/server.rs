//! MCP JSON-RPC 2.0 server implementation for stdio communication.

use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

use testforge_rs::api::engine::TestforgeEngine;
use testforge_rs::core::config::TestforgeConfig;

use crate::mcp::protocol::{
    error_codes, tool_definitions, JsonRpcRequest, JsonRpcResponse, McpCapabilities,
    McpInitResult, McpServerInfo, ToolCallParams, ToolResult,
};
use crate::mcp::tools::{
    execute_analyze_coverage, execute_generate_junit_tests, execute_generate_spec_based_tests,
    execute_parse_test_results, execute_summarize_project,
};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server that handles JSON-RPC 2.0 communication over stdin/stdout
pub struct McpServer {
    server_info: McpServerInfo,
    engine: TestforgeEngine,
}

impl McpServer {
    /// Create a new MCP server instance
    pub fn new(engine: TestforgeEngine) -> Self {
        Self {
            server_info: McpServerInfo {
                name: "testforge".to_string(),
                version: testforge_rs::VERSION.to_string(),
            },
            engine,
        }
    }

    /// Run the MCP server on the process's stdin/stdout
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = AsyncBufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Process newline-delimited JSON-RPC messages until the reader is exhausted
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP JSON-RPC 2.0 server");
        let mut line = String::new();

        loop {
            line.clear();

            let response = match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("EOF reached, shutting down MCP server");
                    break;
                }
                Ok(_) => {
                    // Notifications carry no id and get no reply
                    match self.handle_request(&line).await {
                        Some(response) => response,
                        None => continue,
                    }
                }
                Err(e) => {
                    error!("Error reading from stdin: {}", e);
                    JsonRpcResponse::error(
                        None,
                        error_codes::INTERNAL_ERROR,
                        format!("Failed to read request: {}", e),
                    )
                }
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("MCP server shutdown complete");
        Ok(())
    }

    /// Handle a single JSON-RPC request line
    async fn handle_request(&self, request_line: &str) -> Option<JsonRpcResponse> {
        let request_line = request_line.trim();
        if request_line.is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(request_line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                ));
            }
        };

        debug!("Handling method: {}", request.method);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Only JSON-RPC 2.0 is supported".to_string(),
            ));
        }

        if request.id.is_none() && request.method.starts_with("notifications/") {
            debug!("Ignoring notification {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tool_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Handle MCP initialization
    fn handle_initialize(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        let result = McpInitResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: McpCapabilities {
                tools: serde_json::json!({ "listChanged": false }),
            },
            server_info: self.server_info.clone(),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Handle tools list request
    fn handle_tools_list(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, serde_json::json!({ "tools": tool_definitions() }))
    }

    /// Handle tool call request
    async fn handle_tool_call(
        &self,
        id: Option<serde_json::Value>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing parameters".to_string(),
            );
        };

        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tool call parameters: {}", e),
                );
            }
        };

        let engine = &self.engine;
        let arguments = tool_params.arguments;
        let outcome = match tool_params.name.as_str() {
            "analyze_coverage" => match parse_arguments("analyze_coverage", arguments) {
                Ok(params) => execute_analyze_coverage(engine, params).await,
                Err(err) => Err(err),
            },
            "generate_spec_based_tests" => {
                match parse_arguments("generate_spec_based_tests", arguments) {
                    Ok(params) => execute_generate_spec_based_tests(engine, params).await,
                    Err(err) => Err(err),
                }
            }
            "generate_junit_tests" => match parse_arguments("generate_junit_tests", arguments) {
                Ok(params) => execute_generate_junit_tests(engine, params).await,
                Err(err) => Err(err),
            },
            "summarize_project" => match parse_arguments("summarize_project", arguments) {
                Ok(params) => execute_summarize_project(engine, params).await,
                Err(err) => Err(err),
            },
            "parse_test_results" => match parse_arguments("parse_test_results", arguments) {
                Ok(params) => execute_parse_test_results(engine, params).await,
                Err(err) => Err(err),
            },
            _ => Err((
                error_codes::TOOL_NOT_FOUND,
                format!("Unknown tool: {}", tool_params.name),
            )),
        };

        match outcome.and_then(|result: ToolResult| {
            serde_json::to_value(result)
                .map_err(|e| (error_codes::INTERNAL_ERROR, e.to_string()))
        }) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, message)) => JsonRpcResponse::error(id, code, message),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> Result<T, (i32, String)> {
    // Tools without required fields may be called with no arguments at all
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| {
        (
            error_codes::INVALID_PARAMS,
            format!("Invalid {} parameters: {}", tool, e),
        )
    })
}

/// Run the MCP server with the given configuration
pub async fn run_mcp_server(config: TestforgeConfig) -> anyhow::Result<()> {
    let server = McpServer::new(TestforgeEngine::new(config)?);
    server.run().await
}
