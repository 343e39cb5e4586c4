//! The conversion pipeline.
//!
//! workspace open → resolve or materialize input → dispatch → read output →
//! workspace close. Every outcome, including errors, leaves as a
//! [`ConversionResult`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::collaborators::Collaborators;
use super::dispatcher::{Dispatcher, normalize_format};
use super::envelope::ConversionResult;
use super::error::ConversionError;
use super::materializer::materialize;
use super::request::{ConversionInput, ConversionRequest};
use super::resolver::{CandidateFile, FileResolver, LocalFileSystem};
use super::workspace::ScratchWorkspace;
use crate::core::config::{Config, SecurityConfig};
use crate::core::security::validate_path;

/// Runs conversion requests end to end.
#[derive(Clone)]
pub struct Converter {
    resolver: FileResolver,
    dispatcher: Dispatcher,
    workspace_dir: PathBuf,
    security: SecurityConfig,
}

impl Converter {
    pub fn new(
        resolver: FileResolver,
        dispatcher: Dispatcher,
        workspace_dir: impl Into<PathBuf>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            workspace_dir: workspace_dir.into(),
            security,
        }
    }

    /// Build against the real filesystem with the given collaborators.
    pub fn from_config(config: &Config, collaborators: Collaborators) -> Self {
        Self::new(
            FileResolver::new(Arc::new(LocalFileSystem), config.resolver.clone()),
            Dispatcher::new(collaborators),
            config.workspace.parent_dir.clone(),
            config.security.clone(),
        )
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run `request`, folding any error into a failure result.
    #[instrument(skip_all, fields(target = %request.target_format))]
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        match self.try_convert(request) {
            Ok(bytes) => {
                info!("Conversion to {} succeeded ({} bytes)", request.target_format, bytes.len());
                ConversionResult::from_bytes(&bytes)
            }
            Err(e) => {
                warn!("Conversion to {} failed: {}", request.target_format, e);
                ConversionResult::failure(e.to_string())
            }
        }
    }

    /// Run `request` and return the converted bytes.
    ///
    /// The scratch workspace is removed before this returns, whatever the
    /// outcome.
    pub fn try_convert(&self, request: &ConversionRequest) -> Result<Vec<u8>, ConversionError> {
        let workspace = ScratchWorkspace::create(&self.workspace_dir)?;
        let result = self.run(request, &workspace);
        workspace.close();
        result
    }

    /// Resolve `requested` and check it against the security root.
    pub fn locate(
        &self,
        requested: &str,
        expected_extension: Option<&str>,
    ) -> Result<CandidateFile, ConversionError> {
        let mut candidate = self.resolver.resolve(requested, expected_extension)?;
        candidate.absolute_path = self.check_allowed(&candidate.absolute_path)?;
        Ok(candidate)
    }

    fn check_allowed(&self, path: &Path) -> Result<PathBuf, ConversionError> {
        validate_path(path, &self.security).map_err(|e| ConversionError::PathNotAllowed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn run(
        &self,
        request: &ConversionRequest,
        workspace: &ScratchWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        let (input, source_format) = match &request.input {
            ConversionInput::Path(requested) => {
                let expected = request.source_format.as_deref().map(normalize_format);
                let candidate = self.locate(requested, expected.as_deref())?;
                let source_format = expected
                    .or_else(|| candidate.extension())
                    .ok_or_else(|| {
                        ConversionError::invalid_input(format!(
                            "cannot determine the format of '{}'; pass 'sourceFormat'",
                            candidate.matched_filename
                        ))
                    })?;
                (candidate.absolute_path, source_format)
            }
            ConversionInput::Content {
                data,
                declared_format,
            } => (
                materialize(data, declared_format, workspace)?,
                declared_format.clone(),
            ),
        };

        let output =
            self.dispatcher
                .dispatch(&input, &source_format, &request.target_format, workspace)?;
        Ok(fs::read(&output)?)
    }
}
