use regex::Regex;
use serde_json::{Map, Value};

use super::types::{ClassificationResult, ClassifyError};
use crate::kind::{DeclarationKind, ParseKindError};

/// Maximum number of reply characters quoted in a parse-failure diagnostic.
pub const EXCERPT_CHARS: usize = 200;

/// Prefix of the `reasoning` produced when no JSON could be recovered.
pub const PARSE_FAILURE_PREFIX: &str = "JSON parsing failed. Response: ";

/// Prefix of the `reasoning` produced for any other failed call.
pub const ERROR_PREFIX: &str = "error: ";

/// An extraction strategy looks for a JSON object in a reply.
pub type JsonStrategy = fn(&str) -> Option<Map<String, Value>>;

/// Strategies in priority order. The first one to produce an object wins.
pub const JSON_STRATEGIES: [JsonStrategy; 2] = [json_from_fenced_block, json_from_brace_span];

/// Parse the interior of the first ```` ```json ```` fenced block.
pub fn json_from_fenced_block(reply: &str) -> Option<Map<String, Value>> {
    let re = Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap();
    let body = re.captures(reply)?.get(1)?.as_str();
    non_empty_object(serde_json::from_str(body).ok()?)
}

/// Parse the span from the first `{` to the last `}` of the reply.
pub fn json_from_brace_span(reply: &str) -> Option<Map<String, Value>> {
    let re = Regex::new(r"(?s)\{.*\}").unwrap();
    let span = re.find(reply)?.as_str();
    non_empty_object(serde_json::from_str(span).ok()?)
}

// An empty object carries no verdict and counts as nothing found.
fn non_empty_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Run the strategy chain over a reply.
pub fn extract_json_object(reply: &str) -> Option<Map<String, Value>> {
    JSON_STRATEGIES.iter().find_map(|strategy| strategy(reply))
}

/// Read a verdict out of a parsed JSON object, applying field defaults.
///
/// Missing or `null` fields take their defaults (`false`, no kind, `0.0`, `""`).
/// A kind tag outside the closed set, or a field of the wrong JSON type, is an error.
pub fn verdict_from_object(
    object: &Map<String, Value>,
) -> Result<ClassificationResult, ClassifyError> {
    let is_expressible = match object.get("is_expressible") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => return Err(schema_error("is_expressible", "a boolean", other)),
    };

    let kind = kind_from_value(object.get("lean4_type"))?;

    let confidence = match object.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(other) => return Err(schema_error("confidence", "a number", other)),
    };

    let reasoning = match object.get("reasoning") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(schema_error("reasoning", "a string", other)),
    };

    Ok(ClassificationResult {
        is_expressible,
        kind: if is_expressible { kind } else { None },
        confidence,
        reasoning,
    })
}

fn kind_from_value(value: Option<&Value>) -> Result<Option<DeclarationKind>, ClassifyError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Array(a)) if a.is_empty() => Ok(None),
        Some(Value::Object(o)) if o.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.parse()?)),
        Some(other) => Err(ParseKindError(other.to_string()).into()),
    }
}

fn schema_error(field: &'static str, expected: &str, found: &Value) -> ClassifyError {
    ClassifyError::Schema {
        field,
        message: format!("expected {expected}, found {found}"),
    }
}

/// Turn a raw model reply into a verdict, or say why it could not be done.
pub fn parse_classification_reply(reply: &str) -> Result<ClassificationResult, ClassifyError> {
    let object = extract_json_object(reply.trim()).ok_or(ClassifyError::NoJsonObject)?;
    verdict_from_object(&object)
}

/// Turn a raw model reply into a verdict, falling back to a negative one.
pub fn classification_from_reply(reply: &str) -> ClassificationResult {
    match parse_classification_reply(reply) {
        Ok(result) => result,
        Err(ClassifyError::NoJsonObject) => parse_failure_result(reply),
        Err(err) => error_result(&err),
    }
}

/// Negative verdict quoting the start of a reply that held no JSON.
pub fn parse_failure_result(reply: &str) -> ClassificationResult {
    ClassificationResult::not_expressible(format!(
        "{PARSE_FAILURE_PREFIX}{}...",
        excerpt(reply.trim(), EXCERPT_CHARS)
    ))
}

/// Negative verdict for a failed call.
pub fn error_result(message: &dyn std::fmt::Display) -> ClassificationResult {
    ClassificationResult::not_expressible(format!("{ERROR_PREFIX}{message}"))
}

/// Whether a result was produced by one of the fallback paths.
///
/// The check is by prefix, so a genuine negative verdict whose model-written
/// reasoning itself starts with `error: ` or the parse-failure prefix is
/// reported as a failure too.
pub fn is_classification_failure(result: &ClassificationResult) -> bool {
    !result.is_expressible
        && (result.reasoning.starts_with(PARSE_FAILURE_PREFIX)
            || result.reasoning.starts_with(ERROR_PREFIX))
}

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
