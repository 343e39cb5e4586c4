//! File Converter MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing file
//! conversion tools: office documents, PDFs, spreadsheets, images, HTML and
//! Markdown.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, path security, the server handler and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **conversion**: File resolution, scratch workspaces, routing and external collaborators
//!   - **tools**: The MCP tools wrapping the conversion pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use file_converter_mcp::core::{Config, McpServer, TransportService};
//! use file_converter_mcp::domains::conversion::Collaborators;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let collaborators = Collaborators::detect(&config.collaborators);
//!     let server = McpServer::new(config.clone(), collaborators);
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
