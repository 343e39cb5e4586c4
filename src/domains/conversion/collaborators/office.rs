//! LibreOffice-backed conversions (document, PDF and spreadsheet).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use url::Url;

use super::{Collaborator, CollaboratorError, ConversionJob, run_program};

/// The export LibreOffice performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeTarget {
    /// Any document LibreOffice can open, exported as PDF.
    Pdf,
    /// A PDF imported into Writer and saved as DOCX.
    Docx,
    /// The first sheet of a spreadsheet, exported as CSV.
    Csv,
}

impl OfficeTarget {
    fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Csv => "csv",
        }
    }

    fn convert_to(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx:MS Word 2007 XML",
            Self::Csv => "csv",
        }
    }

    fn input_filter(self) -> Option<&'static str> {
        match self {
            Self::Docx => Some("--infilter=writer_pdf_import"),
            Self::Pdf | Self::Csv => None,
        }
    }
}

/// Runs `soffice --headless --convert-to` for one target format.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: String,
    target: OfficeTarget,
}

impl OfficeConverter {
    pub fn new(program: impl Into<String>, target: OfficeTarget) -> Self {
        Self {
            program: program.into(),
            target,
        }
    }

    /// The file LibreOffice writes: `<outdir>/<input stem>.<ext>`.
    fn produced_path(&self, input: &Path, out_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "converted".to_string());
        out_dir.join(format!("{stem}.{}", self.target.extension()))
    }
}

impl Collaborator for OfficeConverter {
    fn name(&self) -> &'static str {
        "LibreOffice"
    }

    fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
        let out_dir = job
            .output
            .parent()
            .ok_or_else(|| CollaboratorError::Rejected("output path has no parent".to_string()))?;

        // A private profile per workspace keeps concurrent instances from
        // fighting over the user's LibreOffice profile lock.
        let profile = profile_url(out_dir)?;
        let mut command = Command::new(&self.program);
        command
            .arg(format!("-env:UserInstallation={profile}"))
            .arg("--headless")
            .arg("--norestore");
        if let Some(filter) = self.target.input_filter() {
            command.arg(filter);
        }
        command
            .arg("--convert-to")
            .arg(self.target.convert_to())
            .arg("--outdir")
            .arg(out_dir)
            .arg(job.input);

        debug!(
            "Running {} for {} -> {}",
            self.program,
            job.input.display(),
            self.target.extension()
        );
        run_program(&mut command, &self.program)?;

        let produced = self.produced_path(job.input, out_dir);
        if produced != job.output && produced.is_file() {
            fs::rename(&produced, job.output)?;
        }
        Ok(())
    }
}

/// `file://` URL of the LibreOffice profile directory inside `out_dir`.
fn profile_url(out_dir: &Path) -> Result<Url, CollaboratorError> {
    let profile = std::path::absolute(out_dir.join(".lo-profile"))?;
    Url::from_file_path(&profile).map_err(|()| {
        CollaboratorError::Rejected(format!(
            "cannot express {} as a file URL",
            profile.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produced_path_uses_input_stem() {
        let converter = OfficeConverter::new("soffice", OfficeTarget::Csv);
        let produced =
            converter.produced_path(Path::new("/data/Budget 2024.xlsx"), Path::new("/scratch"));
        assert_eq!(produced, PathBuf::from("/scratch/Budget 2024.csv"));
    }

    #[cfg(unix)]
    #[test]
    fn test_profile_url_is_percent_encoded() {
        let url = profile_url(Path::new("/tmp/work dir/mcp-convert-x")).unwrap();
        assert_eq!(
            url.as_str(),
            "file:///tmp/work%20dir/mcp-convert-x/.lo-profile"
        );
        assert_eq!(
            url.to_file_path().unwrap(),
            PathBuf::from("/tmp/work dir/mcp-convert-x/.lo-profile")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_profile_url_of_relative_dir_is_absolute() {
        let url = profile_url(Path::new("scratch")).unwrap();
        let path = url.to_file_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("scratch/.lo-profile"));
    }

    #[test]
    fn test_pdf_import_filter_only_for_docx() {
        assert!(OfficeTarget::Docx.input_filter().is_some());
        assert!(OfficeTarget::Pdf.input_filter().is_none());
        assert!(OfficeTarget::Csv.input_filter().is_none());
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("in.docx");
        fs::write(&input, b"x").unwrap();
        let output = temp_dir.path().join("output.pdf");

        let converter = OfficeConverter::new("/nonexistent/soffice", OfficeTarget::Pdf);
        let err = converter
            .convert(&ConversionJob {
                input: &input,
                output: &output,
                source_format: "docx",
                target_format: "pdf",
            })
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Launch { .. }));
    }
}
