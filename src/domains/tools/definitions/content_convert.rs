//! Inline content conversion tool definition.

use schemars::JsonSchema;
use serde::Deserialize;

use super::generic_convert::conversion_action;
use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::ConversionTool;

/// Parameters for the content conversion tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentConvertParams {
    /// Base64-encoded input.
    #[serde(default)]
    pub content: Option<String>,

    /// Format of the input (e.g. docx, pdf, xlsx, md, html, png).
    #[serde(default, alias = "input_format")]
    pub source_format: Option<String>,

    /// Desired output format (e.g. pdf, docx, csv, html, jpg).
    #[serde(default, alias = "output_format")]
    pub target_format: Option<String>,
}

/// Converts inline base64 content without touching the caller's files.
pub struct ContentConvertTool;

impl ConversionTool for ContentConvertTool {
    const NAME: &'static str = "content-convert";

    const DESCRIPTION: &'static str = "Convert base64-encoded file content between supported \
        formats. Pass 'content', 'sourceFormat' and 'targetFormat'. Use this when the file is \
        not on the server's filesystem. Returns {success, data: base64} or {success: false, error}.";

    type Params = ContentConvertParams;

    fn action(params: &Self::Params) -> String {
        conversion_action(params.source_format.as_deref(), params.target_format.as_deref())
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        ConversionRequest::from_parts(
            None,
            params.content,
            params.source_format,
            params.target_format,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::conversion::CollaboratorKind;
    use crate::domains::tools::definitions::test_support::{converter_with, envelope_of};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    #[test]
    fn test_png_to_jpg_content() {
        let t = converter_with(&[CollaboratorKind::ImageEncoder]);
        let content = STANDARD.encode(b"pixels");

        let result = ContentConvertTool::execute_value(
            json!({ "content": content, "sourceFormat": "PNG", "targetFormat": "jpg" }),
            &t.converter,
        );

        assert_eq!(envelope_of(&result).data, Some(content));
        assert!(t.scratch_is_empty());
    }

    #[test]
    fn test_path_is_ignored() {
        let t = converter_with(&[CollaboratorKind::DocumentRenderer]);
        t.write("a.docx", b"doc");

        let result = ContentConvertTool::execute_value(
            json!({ "path": "a.docx", "sourceFormat": "docx", "targetFormat": "pdf" }),
            &t.converter,
        );

        let error = envelope_of(&result).error.unwrap();
        assert_eq!(
            error,
            "Error converting DOCX to PDF: No input provided: supply either 'path' or 'content'"
        );
    }
}
