use std::path::Path;

use crate::client::{CompletionClient, CompletionError, OllamaClient};
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use leanform_core::generate::{
    definition_from_reply, failed_definition, generation_request, is_failure_code, Component,
    Definition, GENERATE_MAX_TOKENS,
};
use leanform_core::kind::DeclarationKind;

/// Asks the model to write a Lean 4 definition from a list of components.
pub struct Generator<C> {
    client: C,
    max_tokens: u64,
}

impl<C: CompletionClient> Generator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_tokens: GENERATE_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generate a definition. Never fails: a failed call yields a definition whose
    /// code is a `-- error:` diagnostic.
    pub async fn generate(
        &self,
        name: &str,
        kind: DeclarationKind,
        components: Vec<Component>,
        description: &str,
    ) -> Definition {
        let request = generation_request(name, kind, &components, description, self.max_tokens);
        log::debug!(
            "generate: {} {} with {} components, max_tokens={}",
            kind,
            name,
            components.len(),
            request.max_tokens
        );

        match self
            .client
            .complete(&request.messages, request.max_tokens)
            .await
        {
            Ok(reply) if reply.trim().is_empty() => {
                log::warn!("generate: model returned an empty response for {name}");
                failed_definition(name, kind, components, &CompletionError::EmptyResponse)
            }
            Ok(reply) => {
                log::debug!("generate: reply of {} chars", reply.len());
                definition_from_reply(name, kind, components, &reply)
            }
            Err(e) => {
                log::warn!("generate: {e}");
                failed_definition(name, kind, components, &e)
            }
        }
    }
}

#[derive(Debug, clap::Args, Clone)]
pub struct ComponentArgs {
    /// Component as `name: type -- description` (repeatable, order is kept)
    #[arg(short, long = "component", value_name = "SPEC")]
    pub components: Vec<String>,

    /// JSON file with an array of {name, type_annotation, description}
    #[arg(long, value_name = "FILE")]
    pub components_file: Option<String>,
}

impl ComponentArgs {
    /// File components first, then inline ones.
    pub async fn load(&self) -> Result<Vec<Component>> {
        let mut components = match &self.components_file {
            Some(path) => load_components_file(path).await?,
            None => Vec::new(),
        };
        for spec in &self.components {
            components.push(parse_component_spec(spec)?);
        }
        Ok(components)
    }
}

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Name of the Lean object (e.g. Point2D)
    #[arg(long)]
    pub name: String,

    /// Declaration kind: inductive, structure or class
    #[arg(long)]
    pub kind: DeclarationKind,

    #[clap(flatten)]
    pub components: ComponentArgs,

    /// Original description of the object (`-` reads stdin)
    #[arg(long, default_value = "")]
    pub description: String,

    /// Maximum tokens the model may generate
    #[arg(long, default_value_t = GENERATE_MAX_TOKENS)]
    pub max_tokens: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let components = options.components.load().await?;
    let description = crate::classify::read_description(&options.description).await?;

    if global.verbose {
        let request = generation_request(
            &options.name,
            options.kind,
            &components,
            &description,
            options.max_tokens,
        );
        eprintln!("Ollama URL: {}", global.ollama_url);
        eprintln!("Model: {}", global.model);
        eprintln!("Components: {}", components.len());
        eprintln!(
            "Prompt length: {} chars",
            crate::classify::prompt_length(&request)
        );
    }

    let spinner = new_spinner(f!("Generating {} {}...", options.kind, options.name));
    let definition = generate_data(
        options.name,
        options.kind,
        components,
        description,
        global.ollama_url.clone(),
        global.model.clone(),
        options.max_tokens,
    )
    .await;
    spinner.finish_and_clear();
    let definition = definition?;

    print_definition(&definition, options.json)
}

/// Print a definition, failing the command if generation failed in text mode.
pub fn print_definition(definition: &Definition, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(definition)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    if is_failure_code(&definition.code) {
        return Err(Error::GenerationFailed(definition.code.clone()).into());
    }

    println!("{}", format_definition_text(definition));
    Ok(())
}

/// Generate a definition against an Ollama model (for CLI and MCP reuse).
pub async fn generate_data(
    name: String,
    kind: DeclarationKind,
    components: Vec<Component>,
    description: String,
    ollama_url: String,
    model: String,
    max_tokens: u64,
) -> Result<Definition> {
    let client = OllamaClient::new(&ollama_url, model)?;
    let generator = Generator::new(client).with_max_tokens(max_tokens);
    Ok(generator
        .generate(&name, kind, components, &description)
        .await)
}

/// Parse `name: type -- description`.
///
/// The name ends at the first `:`; the description starts after the last ` -- `
/// and may be omitted.
pub fn parse_component_spec(spec: &str) -> Result<Component, Error> {
    let (name, rest) = spec
        .split_once(':')
        .ok_or_else(|| Error::InvalidComponent(spec.to_string()))?;

    let (type_annotation, description) = match rest.rsplit_once(" -- ") {
        Some((ty, desc)) => (ty, desc),
        None => (rest, ""),
    };

    let name = name.trim();
    let type_annotation = type_annotation.trim();
    if name.is_empty() || type_annotation.is_empty() {
        return Err(Error::InvalidComponent(spec.to_string()));
    }

    Ok(Component::new(name, type_annotation, description.trim()))
}

/// Read components from a JSON array file.
pub async fn load_components_file(path: impl AsRef<Path>) -> Result<Vec<Component>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("Failed to read file '{}': {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| eyre!("Invalid components file '{}': {}", path.display(), e))
}

/// Render a definition as colored text with a components table
pub fn format_definition_text(definition: &Definition) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    out.push_str(&format!(
        "{}\n",
        format!("{} {}", definition.kind.as_str().to_uppercase(), definition.name)
            .bright_cyan()
            .bold()
    ));
    out.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if !definition.components.is_empty() {
        let mut table = new_table();
        table.set_titles(prettytable::row!["Name", "Type", "Description"]);
        for component in &definition.components {
            table.add_row(prettytable::row![
                component.name,
                component.type_annotation,
                component.description
            ]);
        }
        out.push_str(&format!("\n{}\n", "Components".green().bold()));
        out.push_str(&table.to_string());
    }

    if !definition.dependencies.is_empty() {
        out.push_str(&format!(
            "\n{}: {}\n",
            "Dependencies".green(),
            definition.dependencies.join(", ")
        ));
    }

    out.push_str(&format!("\n{}\n\n", "Code".green().bold()));
    out.push_str(&definition.code);
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubClient;

    const POINT: &str = "import Mathlib\n\nstructure Point2D where\n  x : ℝ\n  y : ℝ";

    fn point_components() -> Vec<Component> {
        vec![
            Component::new("x", "ℝ", "first coordinate"),
            Component::new("y", "ℝ", "second coordinate"),
        ]
    }

    // ============================================================================
    // Generator tests
    // ============================================================================

    #[tokio::test]
    async fn test_generate_fenced_reply() {
        let client = StubClient::replying(&format!("Sure!\n```lean\n{POINT}\n```"));
        let def = Generator::new(&client)
            .generate(
                "Point2D",
                DeclarationKind::Structure,
                point_components(),
                "A point in the plane",
            )
            .await;

        assert_eq!(def.name, "Point2D");
        assert_eq!(def.kind, DeclarationKind::Structure);
        assert_eq!(def.components, point_components());
        assert_eq!(def.code, POINT);
        assert_eq!(def.dependencies, vec!["Mathlib"]);
    }

    #[tokio::test]
    async fn test_generate_request_shape() {
        let client = StubClient::replying(POINT);
        Generator::new(&client)
            .generate("Point2D", DeclarationKind::Structure, point_components(), "d")
            .await;

        let requests = client.requests();
        let (messages, max_tokens) = &requests[0];
        assert_eq!(*max_tokens, 1000);
        assert_eq!(messages.len(), 1);
        assert!(messages[0]
            .content
            .contains("- x: ℝ -- first coordinate\n- y: ℝ -- second coordinate"));
    }

    #[tokio::test]
    async fn test_generate_unfenced_reply_is_kept_whole() {
        let reply = "import Mathlib.Order.Basic\nimport Mathlib\n\nclass Foo (α : Type*) where\n  op : α → α";
        let client = StubClient::replying(reply);
        let def = Generator::new(&client)
            .generate("Foo", DeclarationKind::Class, Vec::new(), "")
            .await;

        assert_eq!(def.code, reply);
        assert_eq!(def.dependencies, vec!["Mathlib.Order.Basic", "Mathlib"]);
    }

    #[tokio::test]
    async fn test_generate_without_components() {
        let client = StubClient::replying("```lean4\ninductive Nat' where\n  | zero\n  | succ : Nat' → Nat'\n```");
        let def = Generator::new(&client)
            .generate("Nat'", DeclarationKind::Inductive, Vec::new(), "")
            .await;

        assert!(def.components.is_empty());
        assert!(!def.code.is_empty());
        assert!(def.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_generate_client_error() {
        let client = StubClient::failing(CompletionError::Request("timed out".to_string()));
        let def = Generator::new(&client)
            .generate("Point2D", DeclarationKind::Structure, point_components(), "")
            .await;

        assert_eq!(def.code, "-- error: Model request failed: timed out");
        assert!(def.dependencies.is_empty());
        assert_eq!(def.name, "Point2D");
        assert_eq!(def.components, point_components());
        assert!(is_failure_code(&def.code));
    }

    #[tokio::test]
    async fn test_generate_empty_reply_is_a_failure() {
        let client = StubClient::replying("  \n");
        let def = Generator::new(&client)
            .generate("T", DeclarationKind::Structure, Vec::new(), "")
            .await;

        assert_eq!(def.code, "-- error: Model returned an empty response");
    }

    // ============================================================================
    // parse_component_spec tests
    // ============================================================================

    #[test]
    fn test_parse_component_spec() {
        let component = parse_component_spec("mul: G → G → G -- the binary operation").unwrap();
        assert_eq!(component, Component::new("mul", "G → G → G", "the binary operation"));
    }

    #[test]
    fn test_parse_component_spec_type_with_colons() {
        let component =
            parse_component_spec("mul_assoc: ∀ a b c : G, a * b * c = a * (b * c) -- associativity")
                .unwrap();
        assert_eq!(component.name, "mul_assoc");
        assert_eq!(component.type_annotation, "∀ a b c : G, a * b * c = a * (b * c)");
        assert_eq!(component.description, "associativity");
    }

    #[test]
    fn test_parse_component_spec_without_description() {
        let component = parse_component_spec("x : ℝ").unwrap();
        assert_eq!(component, Component::new("x", "ℝ", ""));
    }

    #[test]
    fn test_parse_component_spec_rejects_missing_parts() {
        assert!(matches!(
            parse_component_spec("just a name"),
            Err(Error::InvalidComponent(_))
        ));
        assert!(matches!(
            parse_component_spec(": ℝ -- no name"),
            Err(Error::InvalidComponent(_))
        ));
        assert!(matches!(
            parse_component_spec("x: -- no type"),
            Err(Error::InvalidComponent(_))
        ));
    }

    // ============================================================================
    // component loading tests
    // ============================================================================

    #[tokio::test]
    async fn test_load_components_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.json");
        std::fs::write(
            &path,
            r#"[{"name": "x", "type_annotation": "ℝ", "description": "first coordinate"},
                {"name": "y", "type_annotation": "ℝ", "description": "second coordinate"}]"#,
        )
        .unwrap();

        let components = load_components_file(&path).await.unwrap();
        assert_eq!(components, point_components());
    }

    #[tokio::test]
    async fn test_load_components_file_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.json");
        std::fs::write(&path, "{\"name\": \"x\"}").unwrap();

        let err = load_components_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid components file"));
    }

    #[tokio::test]
    async fn test_component_args_file_then_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.json");
        std::fs::write(
            &path,
            r#"[{"name": "x", "type_annotation": "ℝ", "description": "first coordinate"}]"#,
        )
        .unwrap();

        let args = ComponentArgs {
            components: vec!["y: ℝ -- second coordinate".to_string()],
            components_file: Some(path.to_string_lossy().into_owned()),
        };
        assert_eq!(args.load().await.unwrap(), point_components());
    }

    // ============================================================================
    // formatting tests
    // ============================================================================

    #[test]
    fn test_format_definition_text() {
        colored::control::set_override(false);
        let def = Definition {
            name: "Point2D".to_string(),
            kind: DeclarationKind::Structure,
            components: point_components(),
            code: POINT.to_string(),
            dependencies: vec!["Mathlib".to_string()],
        };
        let text = format_definition_text(&def);
        assert!(text.contains("STRUCTURE Point2D"));
        assert!(text.contains("first coordinate"));
        assert!(text.contains("Dependencies: Mathlib"));
        assert!(text.ends_with(&format!("{POINT}\n")));
    }

    #[test]
    fn test_print_failed_definition_is_an_error_in_text_mode() {
        let def = Definition {
            name: "T".to_string(),
            kind: DeclarationKind::Class,
            components: Vec::new(),
            code: "-- error: boom".to_string(),
            dependencies: Vec::new(),
        };
        let err = print_definition(&def, false).unwrap_err();
        assert!(err.to_string().contains("-- error: boom"));
    }
}
