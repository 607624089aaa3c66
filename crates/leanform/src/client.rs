use std::future::Future;

use leanform_core::message::{ChatMessage, Role};
use rig::client::CompletionClient as _;
use rig::completion::Prompt;
use rig::providers::ollama;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Failed to create model client: {0}")]
    Configuration(String),

    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// A chat-style completion endpoint: messages in, reply text out.
///
/// This is the only seam between the pipeline steps and the network.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u64,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

impl<T: CompletionClient> CompletionClient for &T {
    fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u64,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        (**self).complete(messages, max_tokens)
    }
}

/// Completion client backed by a local Ollama server through rig.
pub struct OllamaClient {
    client: ollama::Client,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, CompletionError> {
        use rig::client::Nothing;

        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            model: model.into(),
        })
    }
}

impl CompletionClient for OllamaClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u64,
    ) -> Result<String, CompletionError> {
        let (preamble, prompt) = split_messages(messages);

        let mut builder = self.client.agent(&self.model).max_tokens(max_tokens);
        if let Some(preamble) = &preamble {
            builder = builder.preamble(preamble);
        }
        let agent = builder.build();

        agent
            .prompt(&prompt)
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))
    }
}

/// Split messages into an agent preamble and a single prompt.
///
/// System messages form the preamble. A lone remaining message is sent as-is;
/// several are flattened into a role-labelled transcript.
pub fn split_messages(messages: &[ChatMessage]) -> (Option<String>, String) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let turns: Vec<&ChatMessage> = messages.iter().filter(|m| m.role != Role::System).collect();

    let preamble = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };

    let prompt = match turns.as_slice() {
        [only] => only.content.clone(),
        turns => turns
            .iter()
            .map(|m| {
                let label = match m.role {
                    Role::Assistant => "Assistant",
                    _ => "User",
                };
                format!("{label}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    (preamble, prompt)
}
