//! Validated conversion requests.

use super::error::ConversionError;

/// Where the input bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionInput {
    /// A caller-supplied path or file name, located by the resolver.
    Path(String),
    /// Inline base64 content with its declared format.
    Content { data: String, declared_format: String },
}

/// One conversion to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: ConversionInput,
    /// Source format. Always set for content input; for path input it is the
    /// expected extension and may be left to the resolved file.
    pub source_format: Option<String>,
    pub target_format: String,
}

impl ConversionRequest {
    /// Build a request from optional tool arguments.
    ///
    /// Blank strings count as absent. Exactly one of `path` and `content`
    /// must be given; `content` additionally requires `source_format`.
    pub fn from_parts(
        path: Option<String>,
        content: Option<String>,
        source_format: Option<String>,
        target_format: Option<String>,
    ) -> Result<Self, ConversionError> {
        let path = non_blank(path);
        let content = non_blank(content);
        let source_format = non_blank(source_format);

        match (&path, &content) {
            (Some(_), Some(_)) => {
                return Err(ConversionError::invalid_input(
                    "supply exactly one of 'path' or 'content', not both",
                ));
            }
            (None, None) => return Err(ConversionError::InputMissing),
            _ => {}
        }

        let target_format = non_blank(target_format)
            .ok_or_else(|| ConversionError::invalid_input("'targetFormat' is required"))?;

        let input = match (path, content) {
            (Some(path), _) => ConversionInput::Path(path),
            (None, data) => {
                let declared_format = source_format.clone().ok_or_else(|| {
                    ConversionError::invalid_input("'sourceFormat' is required when 'content' is used")
                })?;
                ConversionInput::Content {
                    data: data.unwrap_or_default(),
                    declared_format,
                }
            }
        };

        Ok(Self {
            input,
            source_format,
            target_format,
        })
    }

    /// The requested path, in path mode.
    pub fn path(&self) -> Option<&str> {
        match &self.input {
            ConversionInput::Path(path) => Some(path),
            ConversionInput::Content { .. } => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
