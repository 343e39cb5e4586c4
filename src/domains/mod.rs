//! Domains module containing business logic organized by bounded contexts.
//!
//! `conversion` owns the pipeline; `tools` exposes it over MCP.

pub mod conversion;
pub mod tools;
