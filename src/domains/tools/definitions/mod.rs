//! Tool definitions module.
//!
//! One file per conversion tool.

pub mod content_convert;
pub mod docx_to_pdf;
pub mod excel_to_csv;
pub mod generic_convert;
pub mod html_to_pdf;
pub mod image_convert;
pub mod pdf_to_docx;

pub use content_convert::{ContentConvertParams, ContentConvertTool};
pub use docx_to_pdf::DocxToPdfTool;
pub use excel_to_csv::ExcelToCsvTool;
pub use generic_convert::{GenericConvertParams, GenericConvertTool};
pub use html_to_pdf::HtmlToPdfTool;
pub use image_convert::{ImageConvertParams, ImageConvertTool};
pub use pdf_to_docx::PdfToDocxTool;

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::CallToolResult;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::core::config::{ResolverConfig, SecurityConfig};
    use crate::domains::conversion::collaborators::{CollaboratorError, ConversionJob};
    use crate::domains::conversion::resolver::LocalFileSystem;
    use crate::domains::conversion::{
        Collaborator, CollaboratorKind, Collaborators, Converter, Dispatcher, Envelope, FileResolver,
    };

    /// Copies its input to its output.
    pub struct Echo;

    impl Collaborator for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
            fs::copy(job.input, job.output)?;
            Ok(())
        }
    }

    pub struct TestConverter {
        pub files: TempDir,
        pub scratch: TempDir,
        pub converter: Converter,
    }

    impl TestConverter {
        pub fn write(&self, name: &str, bytes: &[u8]) {
            fs::write(self.files.path().join(name), bytes).unwrap();
        }

        pub fn scratch_is_empty(&self) -> bool {
            fs::read_dir(self.scratch.path()).unwrap().count() == 0
        }
    }

    /// A converter over a fresh directory with `kinds` bound to [`Echo`].
    pub fn converter_with(kinds: &[CollaboratorKind]) -> TestConverter {
        let collaborators = kinds.iter().fold(Collaborators::new(), |set, kind| {
            set.with(*kind, Arc::new(Echo))
        });
        converter_over(collaborators)
    }

    /// A converter over a fresh directory with the given bindings.
    pub fn converter_over(collaborators: Collaborators) -> TestConverter {
        let files = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let resolver_config = ResolverConfig {
            current_dir: Some(files.path().to_path_buf()),
            temp_dir: files.path().to_path_buf(),
            common_upload_dirs: vec![],
            agent_upload_dirs: vec![],
            max_depth: 2,
        };
        let converter = Converter::new(
            FileResolver::new(Arc::new(LocalFileSystem), resolver_config),
            Dispatcher::new(collaborators),
            scratch.path(),
            SecurityConfig::default(),
        );
        TestConverter {
            files,
            scratch,
            converter,
        }
    }

    /// The envelope carried in a tool result's structured content.
    pub fn envelope_of(result: &CallToolResult) -> Envelope {
        serde_json::from_value(result.structured_content.clone().unwrap()).unwrap()
    }
}
