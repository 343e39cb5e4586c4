//! Uniform tool response.
//!
//! Every conversion tool answers with the same `{success, data?, error?}`
//! shape, whether it succeeded, failed in an expected way, or blew up.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Terminal outcome of one conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Success { base64_data: String },
    Failure { message: String },
}

impl ConversionResult {
    /// Success carrying `bytes`, base64-encoded.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::Success {
            base64_data: STANDARD.encode(bytes),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Serialized form of a [`ConversionResult`].
///
/// Never carries both `data` and `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Envelope {
    /// Whether the conversion succeeded.
    pub success: bool,
    /// Base64 encoding of the converted file (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Human-readable failure message (failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(bytes: &[u8]) -> Self {
        ConversionResult::from_bytes(bytes).into()
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ConversionResult::failure(message).into()
    }

    /// Render as an MCP tool result: JSON text plus the same value as
    /// structured content. `is_error` mirrors `!success`.
    pub fn into_call_tool_result(self) -> CallToolResult {
        let value = serde_json::to_value(&self).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "error": "failed to serialize response" })
        });
        CallToolResult {
            content: vec![Content::text(value.to_string())],
            structured_content: Some(value),
            is_error: Some(!self.success),
            meta: None,
        }
    }
}

impl From<ConversionResult> for Envelope {
    fn from(result: ConversionResult) -> Self {
        match result {
            ConversionResult::Success { base64_data } => Self {
                success: true,
                data: Some(base64_data),
                error: None,
            },
            ConversionResult::Failure { message } => Self {
                success: false,
                data: None,
                error: Some(message),
            },
        }
    }
}

impl From<ConversionResult> for CallToolResult {
    fn from(result: ConversionResult) -> Self {
        Envelope::from(result).into_call_tool_result()
    }
}
