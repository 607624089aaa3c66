use crate::prelude::*;
use clap::Parser;

mod classify;
mod client;
mod error;
mod generate;
mod mcp;
mod pipeline;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Turn natural-language math into Lean 4 type declarations"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Ollama base URL
    #[clap(long, env = "OLLAMA_URL", global = true, default_value = client::DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Model used for classification and generation
    #[clap(long, env = "LEANFORM_MODEL", global = true, default_value = client::DEFAULT_MODEL)]
    model: String,

    /// Whether to display additional information.
    #[clap(long, env = "LEANFORM_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Judge whether a description can be a Lean 4 inductive, structure or class
    Classify(crate::classify::ClassifyOptions),

    /// Generate a Lean 4 definition from a kind and a list of components
    Generate(crate::generate::GenerateOptions),

    /// Classify a description, then generate its definition if it is expressible
    Pipeline(crate::pipeline::PipelineOptions),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Classify(options) => crate::classify::run(options, app.global).await,
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Pipeline(options) => crate::pipeline::run(options, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
