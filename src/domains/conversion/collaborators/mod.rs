//! External conversion capabilities.
//!
//! Each capability is a [`Collaborator`] with a single blocking `convert`
//! call. Implementations are bound once at startup into a [`Collaborators`]
//! set; a kind that is not bound is reported as unavailable instead of being
//! rediscovered on every request.

mod html;
mod raster;
mod markup;
mod office;

pub use self::html::HtmlRenderer;
pub use self::raster::{IMAGE_FORMATS, ImageEncoder, is_image_format};
pub use self::markup::{MarkupRenderer, render_markdown};
pub use self::office::{OfficeConverter, OfficeTarget};

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::CollaboratorsConfig;

/// Everything a collaborator needs for one conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConversionJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub source_format: &'a str,
    pub target_format: &'a str,
}

/// Failures reported by a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The external program could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The collaborator refused the job (unsupported encoding, bad input).
    #[error("{0}")]
    Rejected(String),

    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A black-box conversion capability.
pub trait Collaborator: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Convert `job.input` into `job.output`.
    fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError>;
}

/// The roles the dispatcher can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorKind {
    /// Word-processor document to PDF.
    DocumentRenderer,
    /// PDF to word-processor document.
    PdfExtractor,
    /// Spreadsheet to CSV.
    SpreadsheetExporter,
    /// HTML to PDF.
    HtmlRenderer,
    /// Markdown to HTML.
    MarkupRenderer,
    /// Raster image re-encoding.
    ImageEncoder,
}

impl CollaboratorKind {
    /// Stage label used in failure messages.
    pub fn stage(self) -> &'static str {
        match self {
            Self::DocumentRenderer => "Document rendering",
            Self::PdfExtractor => "PDF extraction",
            Self::SpreadsheetExporter => "Spreadsheet export",
            Self::HtmlRenderer => "HTML rendering",
            Self::MarkupRenderer => "Markup rendering",
            Self::ImageEncoder => "Image conversion",
        }
    }

    /// Capability name used in "unavailable" messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::DocumentRenderer => "Document to PDF renderer",
            Self::PdfExtractor => "PDF to document extractor",
            Self::SpreadsheetExporter => "Spreadsheet exporter",
            Self::HtmlRenderer => "HTML to PDF renderer",
            Self::MarkupRenderer => "Markdown renderer",
            Self::ImageEncoder => "Image encoder",
        }
    }

    /// What to install to make this capability available.
    pub fn install_hint(self) -> &'static str {
        match self {
            Self::DocumentRenderer | Self::PdfExtractor | Self::SpreadsheetExporter => {
                "Install LibreOffice (e.g. `apt-get install libreoffice`) or set MCP_SOFFICE_PATH."
            }
            Self::HtmlRenderer => {
                "Install wkhtmltopdf (e.g. `apt-get install wkhtmltopdf`) or set MCP_WKHTMLTOPDF_PATH."
            }
            Self::MarkupRenderer | Self::ImageEncoder => "This capability is built in.",
        }
    }
}

/// The collaborators bound for the lifetime of the process.
#[derive(Clone, Default)]
pub struct Collaborators {
    bound: HashMap<CollaboratorKind, Arc<dyn Collaborator>>,
}

impl Collaborators {
    /// An empty set; every kind is unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `collaborator` to `kind`, replacing any previous binding.
    pub fn with(mut self, kind: CollaboratorKind, collaborator: Arc<dyn Collaborator>) -> Self {
        self.bound.insert(kind, collaborator);
        self
    }

    /// Probe the host and bind everything that is present.
    ///
    /// The image encoder and markdown renderer are in-process and always
    /// bound. LibreOffice and wkhtmltopdf are bound only if their binaries
    /// answer a version query.
    pub fn detect(config: &CollaboratorsConfig) -> Self {
        let mut set = Self::new()
            .with(CollaboratorKind::ImageEncoder, Arc::new(ImageEncoder))
            .with(CollaboratorKind::MarkupRenderer, Arc::new(MarkupRenderer));

        if program_available(&config.soffice_path) {
            info!("LibreOffice found at '{}'", config.soffice_path);
            let program = config.soffice_path.clone();
            set = set
                .with(
                    CollaboratorKind::DocumentRenderer,
                    Arc::new(OfficeConverter::new(program.clone(), OfficeTarget::Pdf)),
                )
                .with(
                    CollaboratorKind::PdfExtractor,
                    Arc::new(OfficeConverter::new(program.clone(), OfficeTarget::Docx)),
                )
                .with(
                    CollaboratorKind::SpreadsheetExporter,
                    Arc::new(OfficeConverter::new(program, OfficeTarget::Csv)),
                );
        } else {
            warn!(
                "LibreOffice not found at '{}': document, PDF and spreadsheet conversions are unavailable",
                config.soffice_path
            );
        }

        if program_available(&config.wkhtmltopdf_path) {
            info!("wkhtmltopdf found at '{}'", config.wkhtmltopdf_path);
            set = set.with(
                CollaboratorKind::HtmlRenderer,
                Arc::new(HtmlRenderer::new(config.wkhtmltopdf_path.clone())),
            );
        } else {
            warn!(
                "wkhtmltopdf not found at '{}': HTML and Markdown to PDF are unavailable",
                config.wkhtmltopdf_path
            );
        }

        set
    }

    /// The collaborator bound to `kind`, if any.
    pub fn get(&self, kind: CollaboratorKind) -> Option<&Arc<dyn Collaborator>> {
        self.bound.get(&kind)
    }

    /// Whether `kind` is bound.
    pub fn is_available(&self, kind: CollaboratorKind) -> bool {
        self.bound.contains_key(&kind)
    }
}

/// Check whether an external program can be started.
fn program_available(program: &str) -> bool {
    Command::new(program).arg("--version").output().is_ok()
}

/// Run an external program to completion, mapping spawn errors and
/// non-zero exits.
pub(crate) fn run_program(command: &mut Command, program: &str) -> Result<(), CollaboratorError> {
    let output = command.output().map_err(|e| CollaboratorError::Launch {
        program: program.to_string(),
        source: e,
    })?;

    if !output.status.success() {
        return Err(CollaboratorError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_binds_builtin_collaborators() {
        let config = CollaboratorsConfig {
            soffice_path: "/nonexistent/soffice".to_string(),
            wkhtmltopdf_path: "/nonexistent/wkhtmltopdf".to_string(),
        };
        let set = Collaborators::detect(&config);

        assert!(set.is_available(CollaboratorKind::ImageEncoder));
        assert!(set.is_available(CollaboratorKind::MarkupRenderer));
        assert!(!set.is_available(CollaboratorKind::DocumentRenderer));
        assert!(!set.is_available(CollaboratorKind::PdfExtractor));
        assert!(!set.is_available(CollaboratorKind::SpreadsheetExporter));
        assert!(!set.is_available(CollaboratorKind::HtmlRenderer));
    }

    #[test]
    fn test_run_program_reports_launch_failure() {
        let mut command = Command::new("/nonexistent/program");
        let err = run_program(&mut command, "/nonexistent/program").unwrap_err();
        assert!(matches!(err, CollaboratorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_program_reports_non_zero_exit() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_program(&mut command, "sh").unwrap_err();

        match err {
            CollaboratorError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
