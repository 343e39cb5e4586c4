//! Format-pair routing.
//!
//! Maps a normalised `(source, target)` pair onto the collaborator that
//! performs it. Pairs outside the static table fall back to the image
//! encoder when the source is a raster format; Markdown to PDF runs as a
//! two-stage pipeline through an intermediate HTML file.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use super::collaborators::{CollaboratorKind, Collaborators, ConversionJob, is_image_format};
use super::error::ConversionError;
use super::workspace::ScratchWorkspace;

// ============================================================================
// Format pairs
// ============================================================================

/// Normalise a format name: trim, strip a leading dot, lowercase.
pub fn normalize_format(format: &str) -> String {
    format.trim().trim_start_matches('.').to_lowercase()
}

/// A normalised `(source, target)` lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPair {
    pub source: String,
    pub target: String,
}

impl FormatPair {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: normalize_format(source),
            target: normalize_format(target),
        }
    }
}

/// How a pair is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// A single collaborator call.
    Direct(CollaboratorKind),
    /// Markdown rendered to HTML, then HTML rendered to PDF.
    MarkupToPdf,
}

/// The static dispatch table.
const TABLE: &[(&[&str], &str, Route)] = &[
    (
        &["docx", "doc", "odt", "rtf"],
        "pdf",
        Route::Direct(CollaboratorKind::DocumentRenderer),
    ),
    (
        &["pdf"],
        "docx",
        Route::Direct(CollaboratorKind::PdfExtractor),
    ),
    (
        &["xlsx", "xls", "ods"],
        "csv",
        Route::Direct(CollaboratorKind::SpreadsheetExporter),
    ),
    (
        &["html", "htm"],
        "pdf",
        Route::Direct(CollaboratorKind::HtmlRenderer),
    ),
    (&["md", "markdown"], "pdf", Route::MarkupToPdf),
    (
        &["md", "markdown"],
        "html",
        Route::Direct(CollaboratorKind::MarkupRenderer),
    ),
];

fn route_for(pair: &FormatPair) -> Option<Route> {
    TABLE
        .iter()
        .find(|(sources, target, _)| {
            *target == pair.target && sources.contains(&pair.source.as_str())
        })
        .map(|(_, _, route)| *route)
        .or_else(|| {
            is_image_format(&pair.source).then_some(Route::Direct(CollaboratorKind::ImageEncoder))
        })
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes conversions to the collaborators bound at startup.
#[derive(Clone)]
pub struct Dispatcher {
    collaborators: Collaborators,
}

impl Dispatcher {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Whether the pair has a route, ignoring collaborator availability.
    pub fn supports(source: &str, target: &str) -> bool {
        route_for(&FormatPair::new(source, target)).is_some()
    }

    /// Convert `input` from `source` to `target`, writing the result into
    /// `workspace`. Returns the path of the produced file.
    #[instrument(skip(self, workspace), fields(input = %input.display()))]
    pub fn dispatch(
        &self,
        input: &Path,
        source: &str,
        target: &str,
        workspace: &ScratchWorkspace,
    ) -> Result<PathBuf, ConversionError> {
        let pair = FormatPair::new(source, target);
        let route = route_for(&pair)
            .ok_or_else(|| ConversionError::unsupported(&pair.source, &pair.target))?;
        let output = workspace.output_path(&pair.target);

        match route {
            Route::Direct(kind) => {
                self.run(kind, input, &output, &pair.source, &pair.target)?;
            }
            Route::MarkupToPdf => {
                self.require(CollaboratorKind::MarkupRenderer)?;
                self.require(CollaboratorKind::HtmlRenderer)?;

                let intermediate = workspace.unique_file_path("intermediate", "html");
                let result = self
                    .run(
                        CollaboratorKind::MarkupRenderer,
                        input,
                        &intermediate,
                        &pair.source,
                        "html",
                    )
                    .and_then(|()| {
                        self.run(
                            CollaboratorKind::HtmlRenderer,
                            &intermediate,
                            &output,
                            "html",
                            &pair.target,
                        )
                    });
                remove_intermediate(&intermediate);
                result?;
            }
        }

        debug!("Conversion {} -> {} produced {}", pair.source, pair.target, output.display());
        Ok(output)
    }

    fn require(&self, kind: CollaboratorKind) -> Result<(), ConversionError> {
        if self.collaborators.is_available(kind) {
            Ok(())
        } else {
            Err(ConversionError::CollaboratorUnavailable {
                collaborator: kind.label(),
                hint: kind.install_hint(),
            })
        }
    }

    /// One blocking collaborator call, with its failure and a missing
    /// output file both mapped to `ConversionFailure`.
    fn run(
        &self,
        kind: CollaboratorKind,
        input: &Path,
        output: &Path,
        source_format: &str,
        target_format: &str,
    ) -> Result<(), ConversionError> {
        let collaborator =
            self.collaborators
                .get(kind)
                .ok_or(ConversionError::CollaboratorUnavailable {
                    collaborator: kind.label(),
                    hint: kind.install_hint(),
                })?;

        debug!("Invoking {} ({:?})", collaborator.name(), kind);
        let job = ConversionJob {
            input,
            output,
            source_format,
            target_format,
        };
        collaborator
            .convert(&job)
            .map_err(|e| ConversionError::failure(kind.stage(), e.to_string()))?;

        if !output.is_file() {
            return Err(ConversionError::failure(kind.stage(), "produced no output"));
        }
        Ok(())
    }
}

fn remove_intermediate(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove intermediate file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::conversion::collaborators::{Collaborator, CollaboratorError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Copies input to output and remembers every job it saw.
    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
        outputs: Mutex<Vec<PathBuf>>,
        formats: Mutex<Vec<(String, String)>>,
    }

    impl Collaborator for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outputs.lock().unwrap().push(job.output.to_path_buf());
            self.formats
                .lock()
                .unwrap()
                .push((job.source_format.to_string(), job.target_format.to_string()));
            fs::copy(job.input, job.output)?;
            Ok(())
        }
    }

    struct Failing;

    impl Collaborator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn convert(&self, _job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
            Err(CollaboratorError::Rejected("corrupt input".to_string()))
        }
    }

    struct Silent;

    impl Collaborator for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn convert(&self, _job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
            Ok(())
        }
    }

    fn setup(name: &str, bytes: &[u8]) -> (TempDir, ScratchWorkspace, PathBuf) {
        let parent = TempDir::new().unwrap();
        let workspace = ScratchWorkspace::create(parent.path()).unwrap();
        let input = workspace.path().join(name);
        fs::write(&input, bytes).unwrap();
        (parent, workspace, input)
    }

    #[test]
    fn test_normalize_format() {
        assert_eq!(normalize_format(" .DOCX "), "docx");
        assert_eq!(normalize_format("Md"), "md");
        assert_eq!(FormatPair::new("PNG", ".jpg"), FormatPair::new("png", "jpg"));
    }

    #[test]
    fn test_static_routes() {
        let cases = [
            ("docx", "pdf", Route::Direct(CollaboratorKind::DocumentRenderer)),
            ("RTF", "pdf", Route::Direct(CollaboratorKind::DocumentRenderer)),
            ("pdf", "docx", Route::Direct(CollaboratorKind::PdfExtractor)),
            ("xls", "csv", Route::Direct(CollaboratorKind::SpreadsheetExporter)),
            ("htm", "pdf", Route::Direct(CollaboratorKind::HtmlRenderer)),
            ("markdown", "pdf", Route::MarkupToPdf),
            ("md", "html", Route::Direct(CollaboratorKind::MarkupRenderer)),
        ];
        for (source, target, expected) in cases {
            assert_eq!(
                route_for(&FormatPair::new(source, target)),
                Some(expected),
                "{source} -> {target}"
            );
        }
    }

    #[test]
    fn test_image_pairs_route_to_encoder() {
        let encoder = Some(Route::Direct(CollaboratorKind::ImageEncoder));
        assert_eq!(route_for(&FormatPair::new("png", "jpg")), encoder);
        assert_eq!(route_for(&FormatPair::new("jpg", "png")), encoder);
        assert_eq!(route_for(&FormatPair::new("tif", "webp")), encoder);
    }

    #[test]
    fn test_unsupported_pair() {
        let (_parent, workspace, input) = setup("in.pdf", b"%PDF");
        let dispatcher = Dispatcher::new(Collaborators::new());

        let err = dispatcher
            .dispatch(&input, "pdf", "xlsx", &workspace)
            .unwrap_err();
        match err {
            ConversionError::UnsupportedConversion {
                source_format,
                target_format,
            } => {
                assert_eq!(source_format, "pdf");
                assert_eq!(target_format, "xlsx");
            }
            other => panic!("expected UnsupportedConversion, got {:?}", other),
        }
        assert!(!Dispatcher::supports("txt", "pdf"));
    }

    #[test]
    fn test_png_and_jpg_use_image_encoder() {
        let (_parent, workspace, input) = setup("in.png", b"png-bytes");
        let encoder = Arc::new(Recording::default());
        let dispatcher = Dispatcher::new(
            Collaborators::new().with(CollaboratorKind::ImageEncoder, encoder.clone()),
        );

        let out = dispatcher.dispatch(&input, "png", "jpg", &workspace).unwrap();
        assert_eq!(out, workspace.output_path("jpg"));

        let out = dispatcher.dispatch(&out, "JPG", "PNG", &workspace).unwrap();
        assert_eq!(out, workspace.output_path("png"));
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            encoder.formats.lock().unwrap()[1],
            ("jpg".to_string(), "png".to_string())
        );
    }

    #[test]
    fn test_markdown_to_pdf_runs_both_stages_once() {
        let (_parent, workspace, input) = setup("notes.md", b"# hi");
        let markup = Arc::new(Recording::default());
        let html = Arc::new(Recording::default());
        let dispatcher = Dispatcher::new(
            Collaborators::new()
                .with(CollaboratorKind::MarkupRenderer, markup.clone())
                .with(CollaboratorKind::HtmlRenderer, html.clone()),
        );

        let out = dispatcher.dispatch(&input, "md", "pdf", &workspace).unwrap();

        assert_eq!(markup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(html.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fs::read(&out).unwrap(), b"# hi");

        let intermediate = markup.outputs.lock().unwrap()[0].clone();
        assert_eq!(intermediate.extension().unwrap(), "html");
        assert!(!intermediate.exists());
    }

    #[test]
    fn test_markdown_intermediate_removed_on_failure() {
        let (_parent, workspace, input) = setup("notes.md", b"# hi");
        let markup = Arc::new(Recording::default());
        let dispatcher = Dispatcher::new(
            Collaborators::new()
                .with(CollaboratorKind::MarkupRenderer, markup.clone())
                .with(CollaboratorKind::HtmlRenderer, Arc::new(Failing)),
        );

        let err = dispatcher
            .dispatch(&input, "md", "pdf", &workspace)
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ConversionFailure { stage: "HTML rendering", .. }
        ));
        let intermediate = markup.outputs.lock().unwrap()[0].clone();
        assert!(!intermediate.exists());
    }

    #[test]
    fn test_markdown_pipeline_needs_html_renderer() {
        let (_parent, workspace, input) = setup("notes.md", b"# hi");
        let markup = Arc::new(Recording::default());
        let dispatcher = Dispatcher::new(
            Collaborators::new().with(CollaboratorKind::MarkupRenderer, markup.clone()),
        );

        let err = dispatcher
            .dispatch(&input, "md", "pdf", &workspace)
            .unwrap_err();
        assert!(matches!(err, ConversionError::CollaboratorUnavailable { .. }));
        assert_eq!(markup.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unbound_collaborator_is_unavailable() {
        let (_parent, workspace, input) = setup("in.docx", b"doc");
        let dispatcher = Dispatcher::new(Collaborators::new());

        let err = dispatcher
            .dispatch(&input, "docx", "pdf", &workspace)
            .unwrap_err();
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_collaborator_failure_is_wrapped() {
        let (_parent, workspace, input) = setup("in.xlsx", b"sheet");
        let dispatcher = Dispatcher::new(
            Collaborators::new().with(CollaboratorKind::SpreadsheetExporter, Arc::new(Failing)),
        );

        let err = dispatcher
            .dispatch(&input, "xlsx", "csv", &workspace)
            .unwrap_err();
        assert_eq!(err.to_string(), "Spreadsheet export failed: corrupt input");
    }

    #[test]
    fn test_missing_output_is_failure() {
        let (_parent, workspace, input) = setup("in.pdf", b"%PDF");
        let dispatcher = Dispatcher::new(
            Collaborators::new().with(CollaboratorKind::PdfExtractor, Arc::new(Silent)),
        );

        let err = dispatcher
            .dispatch(&input, "pdf", "docx", &workspace)
            .unwrap_err();
        assert!(err.to_string().contains("produced no output"));
    }
}
