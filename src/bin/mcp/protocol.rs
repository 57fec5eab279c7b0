//! MCP protocol types and message handling for JSON-RPC 2.0 communication.

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<serde_json::Value>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 error structure
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// MCP tool definition for tool discovery
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// MCP capabilities reported during initialization
#[derive(Debug, Serialize)]
pub struct McpCapabilities {
    pub tools: serde_json::Value,
}

/// MCP initialization result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpInitResult {
    pub protocol_version: String,
    pub capabilities: McpCapabilities,
    pub server_info: McpServerInfo,
}

/// MCP server information
#[derive(Debug, Clone, Serialize)]
pub struct McpServerInfo {
    pub name: String,
    pub version: String,
}

/// Tool execution request parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Tool execution result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl ToolResult {
    /// Single text item holding pretty-printed JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![ContentItem {
                content_type: "text".to_string(),
                text: serde_json::to_string_pretty(value)?,
            }],
        })
    }
}

/// Content item in tool result
#[derive(Debug, Serialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Factory methods for [`JsonRpcResponse`].
impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// MCP error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // MCP-specific error codes
    pub const TOOL_NOT_FOUND: i32 = -32001;
    pub const ANALYSIS_ERROR: i32 = -32003;
    pub const REPORT_NOT_FOUND: i32 = -32004;
    pub const RESOLUTION_ERROR: i32 = -32005;
}

fn signatures_properties() -> serde_json::Value {
    serde_json::json!({
        "signatures_path": {
            "type": "string",
            "description": "Path to the signatures JSON produced by the Java source analyzer"
        },
        "signatures": {
            "type": "array",
            "items": {"type": "object"},
            "description": "Inline class signatures; used when signatures_path is absent"
        }
    })
}

fn with_signatures(mut schema: serde_json::Value) -> serde_json::Value {
    if let (Some(properties), serde_json::Value::Object(extra)) = (
        schema["properties"].as_object_mut(),
        signatures_properties(),
    ) {
        properties.extend(extra);
    }
    schema
}

/// Create tool schema for analyze_coverage
pub fn create_analyze_coverage_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "project_root": {
                "type": "string",
                "description": "Maven project root containing target/site/jacoco/jacoco.xml"
            },
            "min_coverage": {
                "type": "number",
                "minimum": 0.0,
                "maximum": 1.0,
                "description": "Coverage ratio below which guidance is produced (optional)"
            }
        },
        "required": ["project_root"]
    })
}

/// Create tool schema for generate_spec_based_tests
pub fn create_generate_spec_based_tests_schema() -> serde_json::Value {
    with_signatures(serde_json::json!({
        "type": "object",
        "properties": {
            "class_fqn": {
                "type": "string",
                "description": "Fully-qualified name of the class under test"
            },
            "method": {
                "type": "string",
                "description": "Method name; the class name selects a constructor"
            },
            "parameter_types": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Exact parameter types selecting an overload (optional)"
            },
            "spec": {
                "type": ["object", "string"],
                "description": "Parameter hints (min, max, allow_null, max_length) as a JSON object or its string encoding"
            },
            "max_cases": {
                "type": "integer",
                "minimum": 0,
                "description": "Maximum number of generated cases (optional)"
            }
        },
        "required": ["class_fqn", "method"]
    }))
}

/// Create tool schema for generate_junit_tests
pub fn create_generate_junit_tests_schema() -> serde_json::Value {
    with_signatures(serde_json::json!({
        "type": "object",
        "properties": {
            "project_root": {
                "type": "string",
                "description": "Maven project root receiving src/test/java files"
            },
            "overwrite": {
                "type": "boolean",
                "default": false,
                "description": "Replace existing test files"
            }
        },
        "required": ["project_root"]
    }))
}

/// Create tool schema for summarize_project
pub fn create_summarize_project_schema() -> serde_json::Value {
    with_signatures(serde_json::json!({
        "type": "object",
        "properties": {}
    }))
}

/// Create tool schema for parse_test_results
pub fn create_parse_test_results_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "reports_dir": {
                "type": "string",
                "description": "Surefire reports directory (default: <project_root>/target/surefire-reports)"
            },
            "project_root": {
                "type": "string",
                "description": "Maven project root, used when reports_dir is absent"
            }
        }
    })
}

/// Every tool this server exposes
pub fn tool_definitions() -> Vec<McpTool> {
    vec![
        McpTool {
            name: "analyze_coverage".to_string(),
            description: "Per-class and per-method JaCoCo coverage with uncovered line ranges and recommendations".to_string(),
            input_schema: create_analyze_coverage_schema(),
        },
        McpTool {
            name: "generate_spec_based_tests".to_string(),
            description: "Boundary-value and equivalence cases plus a JUnit 5 skeleton for one method".to_string(),
            input_schema: create_generate_spec_based_tests_schema(),
        },
        McpTool {
            name: "generate_junit_tests".to_string(),
            description: "Write JUnit 5 skeletons for every class with public methods".to_string(),
            input_schema: create_generate_junit_tests_schema(),
        },
        McpTool {
            name: "summarize_project".to_string(),
            description: "Count classes, methods and public methods in a signatures document".to_string(),
            input_schema: create_summarize_project_schema(),
        },
        McpTool {
            name: "parse_test_results".to_string(),
            description: "Summarize Surefire TEST-*.xml results".to_string(),
            input_schema: create_parse_test_results_schema(),
        },
    ]
}
