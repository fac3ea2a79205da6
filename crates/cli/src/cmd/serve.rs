//! `agent-state serve`: MCP over stdio.
//!
//! One JSON-RPC message per line in, one response per line out. Requests
//! are handled strictly in arrival order.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use agent_state_lib::mcp::McpServer;
use agent_state_lib::{DirStore, Settings};

pub async fn cmd_serve(settings: Settings) -> Result<()> {
  let server = McpServer::new(DirStore::new(), settings);
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = tokio::io::stdout();

  info!("serving MCP on stdio");

  while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
    let Some(response) = server.handle_line(&line) else {
      continue;
    };

    let mut payload = serde_json::to_string(&response).context("Failed to serialize response")?;
    payload.push('\n');
    stdout
      .write_all(payload.as_bytes())
      .await
      .context("Failed to write to stdout")?;
    stdout.flush().await.context("Failed to flush stdout")?;
  }

  info!("stdin closed, shutting down");
  Ok(())
}
