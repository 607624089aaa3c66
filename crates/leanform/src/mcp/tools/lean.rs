use crate::prelude::{eprintln, *};
use leanform_core::classify::{is_classification_failure, CLASSIFY_MAX_TOKENS};
use leanform_core::generate::{is_failure_code, Component, GENERATE_MAX_TOKENS};
use leanform_core::kind::DeclarationKind;
use serde::Deserialize;

use super::{CallToolResult, JsonRpcError};

fn parse_args<T: serde::de::DeserializeOwned>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid arguments: {e}")))
}

pub async fn handle_lean_classify(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct ClassifyArgs {
        description: String,
        ollama_url: Option<String>,
        model: Option<String>,
    }

    let args: ClassifyArgs = parse_args(arguments)?;

    if global.verbose {
        eprintln!(
            "Calling lean_classify: description='{}'",
            args.description.chars().take(50).collect::<String>()
        );
    }

    let result = crate::classify::classify_data(
        args.description,
        args.ollama_url.unwrap_or_else(|| global.ollama_url.clone()),
        args.model.unwrap_or_else(|| global.model.clone()),
        CLASSIFY_MAX_TOKENS,
    )
    .await
    .map_err(|e| JsonRpcError::internal(format!("Tool execution error: {e}")))?;

    CallToolResult::json(&result, is_classification_failure(&result))
}

pub async fn handle_lean_generate(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct GenerateArgs {
        name: String,
        kind: DeclarationKind,
        #[serde(default)]
        components: Vec<Component>,
        #[serde(default)]
        description: String,
        ollama_url: Option<String>,
        model: Option<String>,
    }

    let args: GenerateArgs = parse_args(arguments)?;

    if global.verbose {
        eprintln!(
            "Calling lean_generate: name={}, kind={}, components={}",
            args.name,
            args.kind,
            args.components.len()
        );
    }

    let definition = crate::generate::generate_data(
        args.name,
        args.kind,
        args.components,
        args.description,
        args.ollama_url.unwrap_or_else(|| global.ollama_url.clone()),
        args.model.unwrap_or_else(|| global.model.clone()),
        GENERATE_MAX_TOKENS,
    )
    .await
    .map_err(|e| JsonRpcError::internal(format!("Tool execution error: {e}")))?;

    CallToolResult::json(&definition, is_failure_code(&definition.code))
}
