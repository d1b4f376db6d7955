//! Newline-delimited JSON-RPC over stdio.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::handler::McpHandler;

/// Serves requests read from `reader` until end of input.
///
/// Each non-blank line is one JSON-RPC message; each response is written as
/// one line and flushed immediately.
pub async fn serve<R, W>(handler: &McpHandler, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "Received message");

        if let Some(response) = handler.handle_json(line).await {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
    info!("Input closed, stopping MCP server");
    Ok(())
}

/// Serves on the process's stdin and stdout.
pub async fn serve_stdio(handler: &McpHandler) -> std::io::Result<()> {
    info!("MCP server listening on stdio");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(handler, stdin, tokio::io::stdout()).await
}
