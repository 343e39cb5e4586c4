//! Request-scoped scratch directories.
//!
//! A [`ScratchWorkspace`] is created at the start of every tool execution and
//! removed before the tool returns. Removal happens in [`ScratchWorkspace::close`]
//! on the normal path and in `Drop` on every other path (early returns, panics
//! unwinding through the blocking task), so no call site deletes directories
//! by hand.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Directory name prefix of every scratch workspace.
pub const WORKSPACE_PREFIX: &str = "mcp-convert-";

/// Whether any component of `path` is a scratch workspace directory.
///
/// The resolver uses this to keep away from files other requests are staging.
pub fn is_inside_workspace(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with(WORKSPACE_PREFIX))
}

/// An isolated temporary directory owned by a single conversion request.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
    created_at: DateTime<Utc>,
}

impl ScratchWorkspace {
    /// Create a fresh workspace under `parent`.
    pub fn create(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)?;
        let path = dir.path().to_path_buf();
        debug!("Created scratch workspace {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
            created_at: Utc::now(),
        })
    }

    /// Directory path of this workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the workspace was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Path of the conversion output file for the given extension.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.path.join(format!("output.{extension}"))
    }

    /// A timestamp-qualified file path that does not exist yet.
    ///
    /// The name has the form `<prefix>_<YYYYmmddHHMMSSffffff>.<ext>`; a numeric
    /// suffix is appended if two requests for the same prefix land in the
    /// same microsecond.
    pub fn unique_file_path(&self, prefix: &str, extension: &str) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d%H%M%S%6f");
        let mut candidate = self.path.join(format!("{prefix}_{stamp}.{extension}"));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self
                .path
                .join(format!("{prefix}_{stamp}_{counter}.{extension}"));
            counter += 1;
        }
        candidate
    }

    /// Remove the workspace recursively.
    ///
    /// Failures are logged and swallowed; a request never fails because its
    /// scratch directory could not be deleted.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!("Removed scratch workspace {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove scratch workspace {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        self.release();
    }
}
