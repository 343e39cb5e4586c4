//! HTML or Markdown to PDF tool definition.

use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::handlers::requested_extension;
use crate::domains::tools::{ConversionTool, PathParams};

/// Renders an HTML page or a Markdown document to PDF.
pub struct HtmlToPdfTool;

impl HtmlToPdfTool {
    /// `md` for Markdown paths, `html` for everything else.
    fn source_format(path: &str) -> &'static str {
        match requested_extension(path).as_deref() {
            Some("md") | Some("markdown") => "md",
            _ => "html",
        }
    }
}

impl ConversionTool for HtmlToPdfTool {
    const NAME: &'static str = "html-or-markdown-to-pdf";

    const DESCRIPTION: &'static str = "Convert an HTML (.html, .htm) or Markdown (.md, \
        .markdown) file to PDF. Pass 'path' to the file. Returns {success, data: base64 PDF} or \
        {success: false, error}.";

    type Params = PathParams;

    fn action(params: &Self::Params) -> String {
        match params.path.as_deref().map(Self::source_format) {
            Some("md") => "Error converting Markdown to PDF".to_string(),
            _ => "Error converting HTML to PDF".to_string(),
        }
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        let source = params.path.as_deref().map(Self::source_format);
        ConversionRequest::from_parts(
            params.path,
            None,
            source.map(str::to_string),
            Some("pdf".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::conversion::CollaboratorKind;
    use crate::domains::tools::definitions::test_support::{converter_with, envelope_of};
    use serde_json::json;

    #[test]
    fn test_source_format_by_extension() {
        assert_eq!(HtmlToPdfTool::source_format("README.md"), "md");
        assert_eq!(HtmlToPdfTool::source_format("notes.MARKDOWN"), "md");
        assert_eq!(HtmlToPdfTool::source_format("index.htm"), "html");
        assert_eq!(HtmlToPdfTool::source_format("page"), "html");
    }

    #[test]
    fn test_html_path() {
        let t = converter_with(&[CollaboratorKind::HtmlRenderer]);
        t.write("index.html", b"<p>hi</p>");

        let result = HtmlToPdfTool::execute_value(json!({ "path": "index.html" }), &t.converter);

        assert!(envelope_of(&result).success);
    }

    #[test]
    fn test_markdown_path_uses_pipeline() {
        let t = converter_with(&[CollaboratorKind::MarkupRenderer, CollaboratorKind::HtmlRenderer]);
        t.write("notes.md", b"# hi");

        let result = HtmlToPdfTool::execute_value(json!({ "path": "notes.md" }), &t.converter);

        assert!(envelope_of(&result).success);
        assert!(t.scratch_is_empty());
    }

    #[test]
    fn test_markdown_without_renderer() {
        let t = converter_with(&[CollaboratorKind::MarkupRenderer]);
        t.write("notes.md", b"# hi");

        let result = HtmlToPdfTool::execute_value(json!({ "path": "notes.md" }), &t.converter);

        let error = envelope_of(&result).error.unwrap();
        assert!(error.starts_with("Error converting Markdown to PDF: HTML to PDF renderer is not available"));
    }

    #[test]
    fn test_content_is_not_accepted() {
        let t = converter_with(&[CollaboratorKind::HtmlRenderer]);

        let result = HtmlToPdfTool::execute_value(json!({ "content": "PHA+" }), &t.converter);

        let error = envelope_of(&result).error.unwrap();
        assert!(error.contains("No input provided"));
    }
}
