use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Serve one JSON-RPC request per line until stdin closes.
pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting MCP server with stdio transport...");
        eprintln!("Model: {} at {}", global.model, global.ollama_url);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        log::debug!("mcp <- {request}");

        let response = super::handle_request(request, &global).await;
        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');

        log::debug!("mcp -> {} bytes", payload.len());

        stdout.write_all(&payload).await?;
        stdout.flush().await?;
    }

    Ok(())
}
