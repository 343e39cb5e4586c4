//! Filesystem capability used by the resolver.
//!
//! The resolver never touches `std::fs` directly; it asks a [`FileSystem`]
//! implementation. Production code uses [`LocalFileSystem`], tests inject an
//! in-memory fake.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// The minimal set of filesystem queries the resolver needs.
pub trait FileSystem: Send + Sync {
    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Immediate children of `dir`, sorted by path. Missing or unreadable
    /// directories yield an empty list.
    fn list_dir(&self, dir: &Path) -> Vec<PathBuf>;

    /// Regular files under `root` up to `max_depth` levels deep, sorted by
    /// path. Symlinks are followed. Hidden entries below the root, files and
    /// directories alike, are skipped.
    fn walk_files(&self, root: &Path, max_depth: usize) -> Vec<PathBuf>;
}

/// [`FileSystem`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();
        paths
    }

    fn walk_files(&self, root: &Path, max_depth: usize) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
            // Broken links and link cycles surface as errors here
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
