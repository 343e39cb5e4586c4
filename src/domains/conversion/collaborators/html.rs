//! HTML to PDF through wkhtmltopdf.

use std::process::Command;

use super::{Collaborator, CollaboratorError, ConversionJob, run_program};

/// Renders an HTML file to PDF with `wkhtmltopdf`.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    program: String,
}

impl HtmlRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Collaborator for HtmlRenderer {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--quiet")
            .arg("--enable-local-file-access")
            .arg("--encoding")
            .arg("utf-8")
            .arg(job.input)
            .arg(job.output);
        run_program(&mut command, &self.program)
    }
}
