//! DOCX to PDF tool definition.

use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::{ConversionTool, FileInputParams};

/// Renders a Word document to PDF.
pub struct DocxToPdfTool;

impl ConversionTool for DocxToPdfTool {
    const NAME: &'static str = "docx-to-pdf";

    const DESCRIPTION: &'static str = "Convert a Word document (DOCX) to PDF. Pass either 'path' \
        (a file path or name; close matches in upload folders are found automatically) or \
        'content' (base64-encoded DOCX). Returns {success, data: base64 PDF} or {success: false, error}.";

    type Params = FileInputParams;

    fn action(_params: &Self::Params) -> String {
        "Error converting DOCX to PDF".to_string()
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        ConversionRequest::from_parts(
            params.path,
            params.content,
            Some("docx".to_string()),
            Some("pdf".to_string()),
        )
    }
}
