//! Conversion-specific error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while servicing a conversion request.
///
/// Every variant is recovered at the tool boundary and rendered into a
/// failure envelope; none of them reach the client as a protocol fault.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Neither a path nor inline content was supplied.
    #[error("No input provided: supply either 'path' or 'content'")]
    InputMissing,

    /// A required argument was missing or an argument was malformed.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The resolver exhausted every search tier.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Inline content was not valid base64.
    #[error("Invalid base64 content: {reason}")]
    Decode { reason: String },

    /// The format pair is neither in the dispatch table nor an image conversion.
    #[error("Unsupported conversion: {source_format} to {target_format}")]
    UnsupportedConversion {
        source_format: String,
        target_format: String,
    },

    /// The external conversion capability is not present on this host.
    #[error("{collaborator} is not available on this host. {hint}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        hint: &'static str,
    },

    /// The external collaborator ran but failed or produced no output.
    #[error("{stage} failed: {detail}")]
    ConversionFailure { stage: &'static str, detail: String },

    /// The resolved file lies outside the configured root directory.
    #[error("Access to '{}' is not allowed: {reason}", path.display())]
    PathNotAllowed { path: PathBuf, reason: String },

    /// The scratch workspace could not be created or read.
    #[error("Workspace error: {source}")]
    Workspace {
        #[from]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Create an "invalid input" error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a "not found" error for the requested path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an "unsupported conversion" error.
    pub fn unsupported(source_format: impl Into<String>, target_format: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            source_format: source_format.into(),
            target_format: target_format.into(),
        }
    }

    /// Create a "conversion failure" error for the given stage.
    pub fn failure(stage: &'static str, detail: impl Into<String>) -> Self {
        Self::ConversionFailure {
            stage,
            detail: detail.into(),
        }
    }
}
