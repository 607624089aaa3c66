use crate::classify::{format_classification_text, Classifier};
use crate::client::{CompletionClient, OllamaClient};
use crate::generate::{print_definition, ComponentArgs, Generator};
use crate::prelude::{eprintln, println, *};
use leanform_core::classify::{ClassificationResult, CLASSIFY_MAX_TOKENS};
use leanform_core::generate::{Component, Definition, GENERATE_MAX_TOKENS};
use serde::Serialize;

/// Classification followed, when it allows, by generation.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub classification: ClassificationResult,
    /// Absent when the description was not classified as a Lean type.
    pub definition: Option<Definition>,
}

/// Output-token budgets for the two calls of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub classify: u64,
    pub generate: u64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            classify: CLASSIFY_MAX_TOKENS,
            generate: GENERATE_MAX_TOKENS,
        }
    }
}

/// Run both steps against one client.
pub async fn run_pipeline<C: CompletionClient>(
    client: &C,
    name: &str,
    components: Vec<Component>,
    description: &str,
    budgets: Budgets,
) -> PipelineOutput {
    let classification = Classifier::new(client)
        .with_max_tokens(budgets.classify)
        .classify(description)
        .await;

    let definition = match classification.chosen_kind() {
        Some(kind) => Some(
            Generator::new(client)
                .with_max_tokens(budgets.generate)
                .generate(name, kind, components, description)
                .await,
        ),
        None => {
            log::info!("pipeline: skipping generation for {name}: not expressible");
            None
        }
    };

    PipelineOutput {
        classification,
        definition,
    }
}

#[derive(Debug, clap::Args)]
pub struct PipelineOptions {
    /// Natural-language description of the mathematical object (`-` reads stdin)
    pub description: String,

    /// Name of the Lean object (e.g. Point2D)
    #[arg(long)]
    pub name: String,

    #[clap(flatten)]
    pub components: ComponentArgs,

    /// Maximum tokens the model may generate when classifying
    #[arg(long, default_value_t = CLASSIFY_MAX_TOKENS)]
    pub classify_max_tokens: u64,

    /// Maximum tokens the model may generate when writing the definition
    #[arg(long, default_value_t = GENERATE_MAX_TOKENS)]
    pub generate_max_tokens: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: PipelineOptions, global: crate::Global) -> Result<()> {
    let components = options.components.load().await?;
    let description = crate::classify::read_description(&options.description).await?;

    if global.verbose {
        eprintln!("Ollama URL: {}", global.ollama_url);
        eprintln!("Model: {}", global.model);
        eprintln!(
            "Budgets: classify={} generate={}",
            options.classify_max_tokens, options.generate_max_tokens
        );
    }

    let budgets = Budgets {
        classify: options.classify_max_tokens,
        generate: options.generate_max_tokens,
    };

    let client = OllamaClient::new(&global.ollama_url, global.model.clone())?;

    let spinner = new_spinner(f!("Running pipeline for {}...", options.name));
    let output = run_pipeline(&client, &options.name, components, &description, budgets).await;
    spinner.finish_and_clear();

    if options.json {
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("{}", format_classification_text(&output.classification));

    match &output.definition {
        Some(definition) => print_definition(definition, false),
        None => Err(Error::NotExpressible(output.classification.reasoning.clone()).into()),
    }
}
