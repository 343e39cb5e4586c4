//! Markdown to standalone HTML.

use comrak::{Options, markdown_to_html};
use std::fs;

use super::{Collaborator, CollaboratorError, ConversionJob};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
body { font-family: "DejaVu Sans", Arial, sans-serif; line-height: 1.5; margin: 2em; }
pre, code { font-family: "DejaVu Sans Mono", monospace; background: #f4f4f4; }
pre { padding: 0.75em; overflow-x: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #999; padding: 0.3em 0.6em; }
</style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render Markdown text into a complete HTML page.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    let body = markdown_to_html(text, &options);
    format!("{PAGE_HEAD}{body}{PAGE_TAIL}")
}

/// Built-in Markdown renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl Collaborator for MarkupRenderer {
    fn name(&self) -> &'static str {
        "markdown renderer"
    }

    fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
        let bytes = fs::read(job.input)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| CollaboratorError::Rejected("markdown input is not valid UTF-8".to_string()))?;
        fs::write(job.output, render_markdown(&text))?;
        Ok(())
    }
}
