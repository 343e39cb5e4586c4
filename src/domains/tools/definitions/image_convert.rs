//! Image conversion tool definition.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::conversion::collaborators::{IMAGE_FORMATS, is_image_format};
use crate::domains::conversion::dispatcher::normalize_format;
use crate::domains::conversion::{ConversionError, ConversionRequest};
use crate::domains::tools::ConversionTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the image conversion tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageConvertParams {
    /// Path or file name of the source image.
    #[serde(default, alias = "input_file")]
    pub path: Option<String>,

    /// Base64-encoded source image, as an alternative to `path`.
    #[serde(default)]
    pub content: Option<String>,

    /// Source format (jpg, png, webp, gif, bmp, tiff). Required with
    /// `content`; taken from the file extension with `path`.
    #[serde(default, alias = "input_format")]
    pub source_format: Option<String>,

    /// Target format (jpg, png, webp, gif, bmp, tiff).
    #[serde(default, alias = "output_format")]
    pub target_format: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Re-encodes raster images between common formats.
pub struct ImageConvertTool;

impl ConversionTool for ImageConvertTool {
    const NAME: &'static str = "image-convert";

    const DESCRIPTION: &'static str = "Convert an image between formats (jpg, jpeg, png, webp, \
        gif, bmp, tiff). Pass 'targetFormat' and either 'path' or 'content' (base64; then \
        'sourceFormat' is required). Returns {success, data: base64 image} or {success: false, error}.";

    type Params = ImageConvertParams;

    fn action(params: &Self::Params) -> String {
        match params.target_format.as_deref() {
            Some(target) if !target.trim().is_empty() => {
                format!("Error converting image to {}", normalize_format(target).to_uppercase())
            }
            _ => "Error converting image".to_string(),
        }
    }

    fn build_request(params: Self::Params) -> Result<ConversionRequest, ConversionError> {
        let request = ConversionRequest::from_parts(
            params.path,
            params.content,
            params.source_format,
            params.target_format,
        )?;

        let target = normalize_format(&request.target_format);
        if !is_image_format(&target) {
            return Err(ConversionError::invalid_input(format!(
                "'{}' is not a supported image format (expected one of: {})",
                request.target_format,
                IMAGE_FORMATS.join(", ")
            )));
        }
        if let Some(source) = request.source_format.as_deref() {
            if !is_image_format(&normalize_format(source)) {
                return Err(ConversionError::invalid_input(format!(
                    "'{}' is not a supported image format",
                    source
                )));
            }
        }

        Ok(request)
    }
}
