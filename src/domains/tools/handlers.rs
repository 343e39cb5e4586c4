//! Shared plumbing for the conversion tools.
//!
//! Every tool turns its arguments into a [`ConversionRequest`], hands it to
//! the [`Converter`] on a blocking thread, and answers with an [`Envelope`].
//! Argument errors, conversion errors and panics all come back as failure
//! envelopes, never as protocol errors.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info, info_span};

use crate::domains::conversion::{
    ConversionError, ConversionRequest, ConversionResult, Converter, Envelope,
};

// ============================================================================
// Common parameters
// ============================================================================

/// Path-or-content input shared by most tools.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileInputParams {
    /// Path or file name of the input. If it does not exist as given, the
    /// server looks for close matches in the working directory and common
    /// upload locations.
    #[serde(default, alias = "input_file")]
    pub path: Option<String>,

    /// Base64-encoded file content, as an alternative to `path`.
    #[serde(default)]
    pub content: Option<String>,
}

/// Path-only input for tools that need a file on disk.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PathParams {
    /// Path or file name of the input. If it does not exist as given, the
    /// server looks for close matches in the working directory and common
    /// upload locations.
    #[serde(default, alias = "input_file")]
    pub path: Option<String>,
}

// ============================================================================
// Tool trait
// ============================================================================

/// A conversion tool exposed over MCP.
pub trait ConversionTool: Sized + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Deserialized tool arguments.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Prefix for failure messages, e.g. `Error converting DOCX to PDF`.
    fn action(params: &Self::Params) -> String;

    /// Validate the arguments and build the request.
    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<Self::Params>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<Envelope>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Execute the tool logic. Blocking.
    fn execute(params: Self::Params, converter: &Converter) -> CallToolResult {
        let _span = info_span!("tool", name = Self::NAME).entered();
        info!("{} tool called", Self::NAME);

        let action = Self::action(&params);
        let result = match Self::build_request(params) {
            Ok(request) => converter.convert(&request),
            Err(e) => ConversionResult::failure(e.to_string()),
        };

        match result {
            ConversionResult::Failure { message } => {
                ConversionResult::failure(format!("{action}: {message}")).into()
            }
            success => success.into(),
        }
    }

    /// Execute from raw JSON arguments. Blocking.
    fn execute_value(arguments: serde_json::Value, converter: &Converter) -> CallToolResult {
        match serde_json::from_value::<Self::Params>(arguments) {
            Ok(params) => Self::execute(params, converter),
            Err(e) => Envelope::failure(format!("Invalid arguments for {}: {}", Self::NAME, e))
                .into_call_tool_result(),
        }
    }

    /// Create a ToolRoute for STDIO transport.
    fn create_route<S>(converter: Arc<Converter>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let converter = converter.clone();
            async move {
                let result = run_tool::<Self>(serde_json::Value::Object(args), converter).await;
                Ok::<_, McpError>(result)
            }
            .boxed()
        })
    }
}

/// Run a tool on the blocking pool.
///
/// A panic inside the conversion is reported as a failure envelope; the
/// scratch workspace is released by its `Drop` during unwinding.
pub async fn run_tool<T: ConversionTool>(
    arguments: serde_json::Value,
    converter: Arc<Converter>,
) -> CallToolResult {
    match tokio::task::spawn_blocking(move || T::execute_value(arguments, &converter)).await {
        Ok(result) => result,
        Err(e) => {
            error!("{} task failed: {}", T::NAME, e);
            Envelope::failure(format!("Unexpected error in {}: {}", T::NAME, e))
                .into_call_tool_result()
        }
    }
}

/// Lowercased extension of a requested path, if any.
pub(crate) fn requested_extension(path: &str) -> Option<String> {
    std::path::Path::new(path.trim())
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}
