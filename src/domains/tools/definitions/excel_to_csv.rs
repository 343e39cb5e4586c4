//! Excel to CSV tool definition.

use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::handlers::requested_extension;
use crate::domains::tools::{ConversionTool, PathParams};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Exports the first sheet of an Excel workbook as CSV.
pub struct ExcelToCsvTool;

impl ConversionTool for ExcelToCsvTool {
    const NAME: &'static str = "excel-to-csv";

    const DESCRIPTION: &'static str = "Convert an Excel workbook (.xlsx or .xls) to CSV. Pass \
        'path' to the workbook. Returns {success, data: base64 CSV} or {success: false, error}.";

    type Params = PathParams;

    fn action(_params: &Self::Params) -> String {
        "Error converting Excel to CSV".to_string()
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        let path = params
            .path
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConversionError::InputMissing)?;

        let extension = requested_extension(&path)
            .filter(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                ConversionError::invalid_input(format!(
                    "'{}' is not an Excel file (.xlsx or .xls)",
                    path
                ))
            })?;

        ConversionRequest::from_parts(Some(path), None, Some(extension), Some("csv".to_string()))
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
    fn test_xls_path() {
        let t = converter_with(&[CollaboratorKind::SpreadsheetExporter]);
        t.write("Q3.xls", b"a,b");

        let result = ExcelToCsvTool::execute_value(json!({ "path": "Q3.xls" }), &t.converter);

        let envelope = envelope_of(&result);
        assert_eq!(STANDARD.decode(envelope.data.unwrap()).unwrap(), b"a,b");
    }

    #[test]
    fn test_rejects_other_extensions() {
        let t = converter_with(&[CollaboratorKind::SpreadsheetExporter]);
        t.write("data.csv", b"a,b");

        let result = ExcelToCsvTool::execute_value(json!({ "path": "data.csv" }), &t.converter);

        let error = envelope_of(&result).error.unwrap();
        assert_eq!(
            error,
            "Error converting Excel to CSV: Invalid input: 'data.csv' is not an Excel file (.xlsx or .xls)"
        );
    }

    #[test]
    fn test_missing_path() {
        let t = converter_with(&[CollaboratorKind::SpreadsheetExporter]);

        let result = ExcelToCsvTool::execute_value(json!({ "path": "  " }), &t.converter);

        let error = envelope_of(&result).error.unwrap();
        assert!(error.contains("No input provided"));
    }
}
