use regex::Regex;

use super::types::{Component, Definition};
use crate::kind::DeclarationKind;

/// Prefix of the `code` produced when generation failed.
///
/// It is a Lean line comment, so a failed definition is still inert Lean text.
pub const FAILURE_PREFIX: &str = "-- error: ";

/// Interior of the first ```` ```lean ```` or ```` ```lean4 ```` block, trimmed.
pub fn extract_lean_block(reply: &str) -> Option<String> {
    let re = Regex::new(r"(?s)```lean4?[ \t]*\r?\n(.*?)```").unwrap();
    let body = re.captures(reply)?.get(1)?.as_str();
    Some(body.trim().to_string())
}

/// The code payload of a reply: the fenced Lean block if any, else the reply as-is.
pub fn extract_code(reply: &str) -> String {
    extract_lean_block(reply).unwrap_or_else(|| reply.to_string())
}

/// Module paths named by `import` directives, in order, duplicates kept.
pub fn extract_dependencies(code: &str) -> Vec<String> {
    let re = Regex::new(r"\bimport\s+(\S+)").unwrap();
    re.captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Diagnostic used when a reply carries no code at all.
pub const EMPTY_CODE_MESSAGE: &str = "Model returned no code";

/// Package a model reply into a [`Definition`].
///
/// A reply whose code payload is blank (an empty reply or an empty Lean block)
/// yields a failed definition, so a successful `code` is never empty.
pub fn definition_from_reply(
    name: &str,
    kind: DeclarationKind,
    components: Vec<Component>,
    reply: &str,
) -> Definition {
    let code = extract_code(reply);
    if code.trim().is_empty() {
        return failed_definition(name, kind, components, &EMPTY_CODE_MESSAGE);
    }
    let dependencies = extract_dependencies(&code);

    Definition {
        name: name.to_string(),
        kind,
        components,
        code,
        dependencies,
    }
}

/// A definition whose code is a diagnostic comment.
pub fn failed_definition(
    name: &str,
    kind: DeclarationKind,
    components: Vec<Component>,
    message: &dyn std::fmt::Display,
) -> Definition {
    Definition {
        name: name.to_string(),
        kind,
        components,
        code: format!("{FAILURE_PREFIX}{message}"),
        dependencies: Vec::new(),
    }
}

/// Whether a `code` value is a generation failure diagnostic.
pub fn is_failure_code(code: &str) -> bool {
    code.starts_with(FAILURE_PREFIX)
}
