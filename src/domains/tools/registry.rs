//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Dispatch of tool calls by name (used by the HTTP transport)
//! - Tool metadata for listing

use std::sync::Arc;
use tracing::warn;

use rmcp::model::{CallToolResult, Tool};

use super::definitions::{
    ContentConvertTool, DocxToPdfTool, ExcelToCsvTool, GenericConvertTool, HtmlToPdfTool,
    ImageConvertTool, PdfToDocxTool,
};
use super::error::ToolError;
use super::{ConversionTool, run_tool};
use crate::domains::conversion::Converter;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    converter: Arc<Converter>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(converter: Arc<Converter>) -> Self {
        Self { converter }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            DocxToPdfTool::NAME,
            PdfToDocxTool::NAME,
            ImageConvertTool::NAME,
            ExcelToCsvTool::NAME,
            HtmlToPdfTool::NAME,
            GenericConvertTool::NAME,
            ContentConvertTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            DocxToPdfTool::to_tool(),
            PdfToDocxTool::to_tool(),
            ImageConvertTool::to_tool(),
            ExcelToCsvTool::to_tool(),
            HtmlToPdfTool::to_tool(),
            GenericConvertTool::to_tool(),
            ContentConvertTool::to_tool(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// `arguments` must be a JSON object or null. Conversion failures are
    /// part of the returned result, not errors.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let arguments = match arguments {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            serde_json::Value::Object(map) => serde_json::Value::Object(map),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "expected an object, got {}",
                    other
                )));
            }
        };

        let converter = self.converter.clone();
        let result = match name {
            DocxToPdfTool::NAME => run_tool::<DocxToPdfTool>(arguments, converter).await,
            PdfToDocxTool::NAME => run_tool::<PdfToDocxTool>(arguments, converter).await,
            ImageConvertTool::NAME => run_tool::<ImageConvertTool>(arguments, converter).await,
            ExcelToCsvTool::NAME => run_tool::<ExcelToCsvTool>(arguments, converter).await,
            HtmlToPdfTool::NAME => run_tool::<HtmlToPdfTool>(arguments, converter).await,
            GenericConvertTool::NAME => run_tool::<GenericConvertTool>(arguments, converter).await,
            ContentConvertTool::NAME => run_tool::<ContentConvertTool>(arguments, converter).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::unknown_tool(name));
            }
        };
        Ok(result)
    }

    /// Dispatch a tool call and serialize the full `CallToolResult`.
    #[cfg(feature = "http")]
    pub async fn http_handler(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let result = self.call_tool(name, arguments).await?;
        Ok(serde_json::to_value(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::conversion::Collaborators;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(Converter::from_config(
            &Config::default(),
            Collaborators::new(),
        )))
    }

    #[test]
    fn test_registry_tool_names() {
        let names = registry().tool_names();
        assert_eq!(names.len(), 7);
        assert_eq!(ToolRegistry::get_all_tools().len(), 7);
        assert!(names.contains(&"generic-convert"));
        assert!(names.contains(&"content-convert"));
    }

    #[tokio::test]
    async fn test_call_without_input_is_failure_envelope() {
        let registry = registry();
        for name in registry.tool_names() {
            let result = registry
                .call_tool(name, serde_json::json!({}))
                .await
                .unwrap();
            let value = result.structured_content.unwrap();
            assert_eq!(value["success"], serde_json::json!(false), "{name}");
            assert!(
                value["error"].as_str().unwrap().contains("No input provided"),
                "{name}: {value}"
            );
            assert!(value.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn test_call_unknown() {
        let result = registry().call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_call_with_non_object_arguments() {
        let result = registry()
            .call_tool("docx-to-pdf", serde_json::json!([1, 2]))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_handler_serializes_result() {
        let value = registry()
            .http_handler("content-convert", serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(value["isError"], serde_json::json!(true));
        assert_eq!(value["structuredContent"]["success"], serde_json::json!(false));
    }
}
