//! PDF to DOCX tool definition.

use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::{ConversionTool, FileInputParams};

/// Extracts an editable Word document from a PDF.
pub struct PdfToDocxTool;

impl ConversionTool for PdfToDocxTool {
    const NAME: &'static str = "pdf-to-docx";

    const DESCRIPTION: &'static str = "Convert a PDF to an editable Word document (DOCX). Pass \
        either 'path' or 'content' (base64-encoded PDF). Returns {success, data: base64 DOCX} or \
        {success: false, error}.";

    type Params = FileInputParams;

    fn action(_params: &Self::Params) -> String {
        "Error converting PDF to DOCX".to_string()
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        ConversionRequest::from_parts(
            params.path,
            params.content,
            Some("pdf".to_string()),
            Some("docx".to_string()),
        )
    }
}
