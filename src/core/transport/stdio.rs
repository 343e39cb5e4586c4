//! STDIO transport implementation.
//!
//! The default mode: an agent launches the converter as a child process and
//! speaks MCP over its stdin/stdout. stdout therefore carries protocol frames
//! only; all logging goes to stderr (see `init_logging` in `main.rs`).
//!
//! Conversions run on tokio's blocking pool, so a slow LibreOffice or
//! wkhtmltopdf run does not stall reading the next request from stdin.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve `server` on stdin/stdout until the client closes the stream.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - {} serving {} conversion tools via stdin/stdout",
            server.name(),
            server.list_tools().len()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        // Returns once the client closes stdin
        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("Client disconnected, STDIO transport finished");
        Ok(())
    }
}
