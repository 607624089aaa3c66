use crate::client::{CompletionClient, OllamaClient};
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use leanform_core::classify::{
    classification_from_reply, classification_request, error_result, is_classification_failure,
    ClassificationResult, CLASSIFY_MAX_TOKENS,
};
use leanform_core::message::CompletionRequest;
use tokio::io::AsyncReadExt;

/// Asks the model whether a description can be a Lean 4 type, and which kind.
pub struct Classifier<C> {
    client: C,
    max_tokens: u64,
}

impl<C: CompletionClient> Classifier<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_tokens: CLASSIFY_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Classify a description. Never fails: every failure becomes a negative verdict.
    pub async fn classify(&self, description: &str) -> ClassificationResult {
        let request = classification_request(description, self.max_tokens);
        log::debug!(
            "classify: prompt of {} chars, max_tokens={}",
            request.messages[0].content.len(),
            request.max_tokens
        );

        let result = match self
            .client
            .complete(&request.messages, request.max_tokens)
            .await
        {
            Ok(reply) => {
                log::debug!("classify: reply of {} chars", reply.len());
                classification_from_reply(&reply)
            }
            Err(e) => error_result(&e),
        };

        if is_classification_failure(&result) {
            log::warn!("classify: falling back to negative verdict: {}", result.reasoning);
        }

        result
    }
}

#[derive(Debug, clap::Args)]
pub struct ClassifyOptions {
    /// Natural-language description of the mathematical object (`-` reads stdin)
    pub description: String,

    /// Maximum tokens the model may generate
    #[arg(long, default_value_t = CLASSIFY_MAX_TOKENS)]
    pub max_tokens: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ClassifyOptions, global: crate::Global) -> Result<()> {
    let description = read_description(&options.description).await?;

    if global.verbose {
        let request = classification_request(&description, options.max_tokens);
        eprintln!("Ollama URL: {}", global.ollama_url);
        eprintln!("Model: {}", global.model);
        eprintln!("Prompt length: {} chars", prompt_length(&request));
    }

    let spinner = new_spinner("Classifying description...");
    let result = classify_data(
        description,
        global.ollama_url.clone(),
        global.model.clone(),
        options.max_tokens,
    )
    .await;
    spinner.finish_and_clear();
    let result = result?;

    if options.json {
        let json_output = serde_json::to_string_pretty(&result)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json_output);
    } else {
        println!("{}", format_classification_text(&result));
    }

    Ok(())
}

/// Classify a description against an Ollama model (for CLI and MCP reuse).
///
/// Only client construction can fail; the classification itself always yields a verdict.
pub async fn classify_data(
    description: String,
    ollama_url: String,
    model: String,
    max_tokens: u64,
) -> Result<ClassificationResult> {
    let client = OllamaClient::new(&ollama_url, model)?;
    let classifier = Classifier::new(client).with_max_tokens(max_tokens);
    Ok(classifier.classify(&description).await)
}

/// Size of the prompt a request carries, across all its messages.
pub fn prompt_length(request: &CompletionRequest) -> usize {
    request.messages.iter().map(|m| m.content.len()).sum()
}

/// Resolve a description argument, reading stdin for `-`.
pub async fn read_description(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .map_err(|e| eyre!("Failed to read description from stdin: {}", e))?;

    let description = buffer.trim().to_string();
    if description.is_empty() {
        return Err(Error::Generic("empty description on stdin".to_string()).into());
    }
    Ok(description)
}

/// Render a verdict as colored text
pub fn format_classification_text(result: &ClassificationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    out.push_str(&format!("{}\n", "CLASSIFICATION".bright_cyan().bold()));
    out.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    let verdict = if result.is_expressible {
        "yes".green().bold()
    } else {
        "no".red().bold()
    };
    out.push_str(&format!("\n{}: {}\n", "Expressible".green(), verdict));

    let kind = result
        .kind
        .map(|k| k.to_string())
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("{}: {}\n", "Kind".green(), kind.bright_white().bold()));
    out.push_str(&format!(
        "{}: {}\n",
        "Confidence".green(),
        format!("{:.2}", result.confidence).bright_yellow()
    ));
    out.push_str(&format!("{}: {}\n", "Reasoning".green(), result.reasoning));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubClient;
    use crate::client::CompletionError;
    use leanform_core::kind::DeclarationKind;
    use leanform_core::message::Role;

    const STRUCTURE_REPLY: &str = "```json\n{\"is_expressible\": true, \"lean4_type\": \"structure\", \"confidence\": 0.9, \"reasoning\": \"r\"}\n```";

    #[tokio::test]
    async fn test_classify_fenced_verdict() {
        let client = StubClient::replying(STRUCTURE_REPLY);
        let result = Classifier::new(&client).classify("ℝ²").await;

        assert!(result.is_expressible);
        assert_eq!(result.kind, Some(DeclarationKind::Structure));
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.reasoning, "r");
    }

    #[tokio::test]
    async fn test_classify_sends_single_user_message_with_budget() {
        let client = StubClient::replying(STRUCTURE_REPLY);
        Classifier::new(&client).classify("The integers").await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let (messages, max_tokens) = &requests[0];
        assert_eq!(*max_tokens, 500);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.contains("The integers"));
    }

    #[test]
    fn test_prompt_length_counts_the_user_message() {
        let request = classification_request("The integers", CLASSIFY_MAX_TOKENS);
        let length = prompt_length(&request);
        assert_eq!(length, request.messages[0].content.len());
        assert!(length > "The integers".len());
    }

    #[tokio::test]
    async fn test_classify_custom_budget() {
        let client = StubClient::replying(STRUCTURE_REPLY);
        Classifier::new(&client)
            .with_max_tokens(64)
            .classify("x")
            .await;
        assert_eq!(client.requests()[0].1, 64);
    }

    #[tokio::test]
    async fn test_classify_client_error_becomes_negative_verdict() {
        let client = StubClient::failing(CompletionError::Request("connection refused".to_string()));
        let result = Classifier::new(&client).classify("x").await;

        assert!(!result.is_expressible);
        assert_eq!(result.kind, None);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reasoning, "error: Model request failed: connection refused");
    }

    #[tokio::test]
    async fn test_classify_prose_reply() {
        let client = StubClient::replying("I think it is probably a structure.");
        let result = Classifier::new(&client).classify("x").await;

        assert!(!result.is_expressible);
        assert_eq!(result.kind, None);
        assert!(result
            .reasoning
            .starts_with("JSON parsing failed. Response: I think it is"));
        assert!(result.reasoning.ends_with("..."));
    }

    #[tokio::test]
    async fn test_classify_unknown_kind() {
        let client = StubClient::replying(
            "{\"is_expressible\": true, \"lean4_type\": \"enum\", \"confidence\": 0.7, \"reasoning\": \"r\"}",
        );
        let result = Classifier::new(&client).classify("x").await;

        assert!(!result.is_expressible);
        assert_eq!(result.kind, None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.reasoning.starts_with("error: "));
    }

    #[tokio::test]
    async fn test_classify_confidence_is_always_finite() {
        for reply in [
            STRUCTURE_REPLY,
            "",
            "{broken",
            "{\"confidence\": 1e308, \"is_expressible\": true, \"lean4_type\": \"class\"}",
        ] {
            let client = StubClient::replying(reply);
            let result = Classifier::new(&client).classify("x").await;
            assert!(result.confidence.is_finite(), "{reply}");
            if !result.is_expressible {
                assert_eq!(result.kind, None, "{reply}");
            }
        }
    }

    #[tokio::test]
    async fn test_read_description_passes_arguments_through() {
        assert_eq!(read_description("A monoid").await.unwrap(), "A monoid");
    }

    #[test]
    fn test_format_classification_text() {
        colored::control::set_override(false);
        let text = format_classification_text(&ClassificationResult {
            is_expressible: true,
            kind: Some(DeclarationKind::Class),
            confidence: 0.85,
            reasoning: "an interface".to_string(),
        });
        assert!(text.contains("Expressible: yes"));
        assert!(text.contains("Kind: class"));
        assert!(text.contains("Confidence: 0.85"));
        assert!(text.contains("Reasoning: an interface"));
    }

    #[test]
    fn test_format_negative_verdict_has_no_kind() {
        colored::control::set_override(false);
        let text = format_classification_text(&ClassificationResult::not_expressible("a function"));
        assert!(text.contains("Expressible: no"));
        assert!(text.contains("Kind: -"));
    }
}
