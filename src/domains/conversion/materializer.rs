//! Inline content staging.
//!
//! Decodes base64 payloads sent by the client and writes them into the
//! request's scratch workspace so collaborators can work on a real file.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};

use super::error::ConversionError;
use super::workspace::ScratchWorkspace;

/// Decode `content` and write it to a fresh file inside `workspace`.
///
/// Accepts surrounding whitespace, wrapped lines and a `data:<mime>;base64,`
/// prefix. The file is named `input_<timestamp>.<ext>`, where `<ext>` is the
/// normalised `declared_extension`.
#[instrument(skip(content, workspace), fields(len = content.len()))]
pub fn materialize(
    content: &str,
    declared_extension: &str,
    workspace: &ScratchWorkspace,
) -> Result<PathBuf, ConversionError> {
    let bytes = decode_content(content)?;
    let extension = sanitize_extension(declared_extension);
    let path = workspace.unique_file_path("input", &extension);

    fs::write(&path, &bytes)?;
    debug!("Materialized {} bytes to {}", bytes.len(), path.display());

    Ok(path)
}

/// Decode base64 content, tolerating data-URL prefixes and line wrapping.
pub fn decode_content(content: &str) -> Result<Vec<u8>, ConversionError> {
    let payload = match content.trim().split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => content,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ConversionError::Decode {
            reason: "content is empty".to_string(),
        });
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ConversionError::Decode {
            reason: e.to_string(),
        })
}

/// Lowercase, strip a leading dot and drop anything but ASCII alphanumerics.
fn sanitize_extension(extension: &str) -> String {
    let cleaned: String = extension
        .trim()
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}
