//! Generic conversion tool definition.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::conversion::dispatcher::normalize_format;
use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::ConversionTool;

/// Parameters for the generic conversion tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericConvertParams {
    /// Path or file name of the input.
    #[serde(default, alias = "input_file")]
    pub path: Option<String>,

    /// Base64-encoded input, as an alternative to `path`.
    #[serde(default)]
    pub content: Option<String>,

    /// Format of the input (e.g. docx, pdf, xlsx, md, html, png).
    #[serde(default, alias = "input_format")]
    pub source_format: Option<String>,

    /// Desired output format (e.g. pdf, docx, csv, html, jpg).
    #[serde(default, alias = "output_format")]
    pub target_format: Option<String>,
}

/// Describe a conversion for failure messages.
pub(crate) fn conversion_action(source: Option<&str>, target: Option<&str>) -> String {
    let label = |format: Option<&str>| {
        format
            .map(normalize_format)
            .filter(|f| !f.is_empty())
            .map(|f| f.to_uppercase())
    };
    match (label(source), label(target)) {
        (Some(source), Some(target)) => format!("Error converting {source} to {target}"),
        _ => "Error converting file".to_string(),
    }
}

/// Converts between any supported pair of formats.
pub struct GenericConvertTool;

impl ConversionTool for GenericConvertTool {
    const NAME: &'static str = "generic-convert";

    const DESCRIPTION: &'static str = "Convert a file between any supported pair of formats: \
        docx/doc/odt/rtf to pdf, pdf to docx, xlsx/xls/ods to csv, html to pdf, md to pdf or html, \
        and between image formats. Pass 'sourceFormat', 'targetFormat' and either 'path' or \
        'content' (base64). Returns {success, data: base64} or {success: false, error}.";

    type Params = GenericConvertParams;

    fn action(params: &Self::Params) -> String {
        conversion_action(params.source_format.as_deref(), params.target_format.as_deref())
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        let request = ConversionRequest::from_parts(
            params.path,
            params.content,
            params.source_format,
            params.target_format,
        )?;
        if request.source_format.is_none() {
            return Err(ConversionError::invalid_input("'sourceFormat' is required"));
        }
        Ok(request)
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
    fn test_ten_byte_docx_to_pdf_echo() {
        let t = converter_with(&[CollaboratorKind::DocumentRenderer]);
        let content = STANDARD.encode(b"ABCDEFGHIJ");

        let result = GenericConvertTool::execute_value(
            json!({ "content": content, "sourceFormat": "docx", "targetFormat": "pdf" }),
            &t.converter,
        );

        let value = result.structured_content.clone().unwrap();
        assert_eq!(value, json!({ "success": true, "data": content }));
        assert!(t.scratch_is_empty());
    }

    #[test]
    fn test_unsupported_pair() {
        let t = converter_with(&[CollaboratorKind::DocumentRenderer]);
        t.write("deck.pptx", b"pptx");

        let result = GenericConvertTool::execute_value(
            json!({ "path": "deck.pptx", "sourceFormat": "pptx", "targetFormat": "mp4" }),
            &t.converter,
        );

        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("Error converting PPTX to MP4: Unsupported conversion: pptx to mp4")
        );
    }

    #[test]
    fn test_source_format_required() {
        let t = converter_with(&[CollaboratorKind::DocumentRenderer]);
        t.write("a.docx", b"doc");

        let result = GenericConvertTool::execute_value(
            json!({ "path": "a.docx", "targetFormat": "pdf" }),
            &t.converter,
        );

        let error = envelope_of(&result).error.unwrap();
        assert!(error.starts_with("Error converting file: "));
        assert!(error.contains("sourceFormat"));
    }

    #[test]
    fn test_malformed_arguments_are_enveloped() {
        let t = converter_with(&[]);

        let result = GenericConvertTool::execute_value(json!({ "path": 42 }), &t.converter);

        let envelope = envelope_of(&result);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().starts_with("Invalid arguments for generic-convert"));
    }

    #[test]
    fn test_conversion_action() {
        assert_eq!(
            conversion_action(Some(".md"), Some("PDF")),
            "Error converting MD to PDF"
        );
        assert_eq!(conversion_action(None, Some("pdf")), "Error converting file");
    }
}
