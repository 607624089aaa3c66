mod lean;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

impl CallToolResult {
    /// Pretty JSON of `value` as the single text content.
    pub fn json<T: Serialize>(value: &T, is_error: bool) -> Result<serde_json::Value, JsonRpcError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| JsonRpcError::internal(format!("Serialization error: {e}")))?;

        let result = CallToolResult {
            content: vec![Content::Text { text }],
            is_error: is_error.then_some(true),
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
    }
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "leanform".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "lean_classify".to_string(),
            description: "Judge whether a natural-language description of a mathematical object (LaTeX allowed) can be represented in Lean 4 as an `inductive`, `structure` or `class` type. Returns is_expressible, lean4_type, confidence and reasoning. Failures are reported as is_expressible=false with a diagnostic reasoning.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "description": {
                        "type": "string",
                        "description": "Description of the mathematical object"
                    },
                    "ollama_url": {
                        "type": "string",
                        "description": "Ollama base URL (default: server setting)"
                    },
                    "model": {
                        "type": "string",
                        "description": "Model name (default: server setting)"
                    }
                },
                "required": ["description"]
            }),
        },
        Tool {
            name: "lean_generate".to_string(),
            description: "Generate a complete Lean 4 definition of the given kind from an object name, an ordered list of components and the original description. Returns the code and the modules it imports. A code value starting with '-- error:' means generation failed.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the Lean object (e.g., 'Point2D')"
                    },
                    "kind": {
                        "type": "string",
                        "description": "Declaration kind, usually the lean4_type returned by lean_classify",
                        "enum": ["inductive", "structure", "class"]
                    },
                    "components": {
                        "type": "array",
                        "description": "Fields or operations, one line each in the definition body, in order",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "type_annotation": { "type": "string" },
                                "description": { "type": "string" }
                            },
                            "required": ["name", "type_annotation", "description"]
                        }
                    },
                    "description": {
                        "type": "string",
                        "description": "Original description of the object"
                    },
                    "ollama_url": {
                        "type": "string",
                        "description": "Ollama base URL (default: server setting)"
                    },
                    "model": {
                        "type": "string",
                        "description": "Model name (default: server setting)"
                    }
                },
                "required": ["name", "kind"]
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))?;

    match params.name.as_str() {
        "lean_classify" => lean::handle_lean_classify(params.arguments, global).await,
        "lean_generate" => lean::handle_lean_generate(params.arguments, global).await,
        _ => Err(JsonRpcError::invalid_params(format!(
            "Unknown tool: {}",
            params.name
        ))),
    }
}
