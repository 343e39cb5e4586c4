//! Ordered search locations for the resolver.

use std::path::{Path, PathBuf};

use super::SourceLocation;
use super::filesystem::FileSystem;
use crate::core::config::ResolverConfig;

/// A directory the resolver searches, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub location: SourceLocation,
    pub path: PathBuf,
}

/// The ordered, de-duplicated list of directories to search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    roots: Vec<SearchRoot>,
}

impl SearchRoots {
    /// Build from an explicit list, dropping later duplicates of a path.
    pub fn new(roots: impl IntoIterator<Item = SearchRoot>) -> Self {
        let mut unique: Vec<SearchRoot> = Vec::new();
        for root in roots {
            if !unique.iter().any(|r| r.path == root.path) {
                unique.push(root);
            }
        }
        Self { roots: unique }
    }

    /// Discover the roots that exist on the host.
    ///
    /// Order: current directory, temp directory, common upload directories,
    /// agent upload directories. Relative entries are taken relative to
    /// `current_dir`; directories that do not exist are skipped.
    pub fn discover(config: &ResolverConfig, current_dir: &Path, fs: &dyn FileSystem) -> Self {
        let candidates = std::iter::once((SourceLocation::CurrentDir, current_dir.to_path_buf()))
            .chain(std::iter::once((
                SourceLocation::TempDir,
                config.temp_dir.clone(),
            )))
            .chain(
                config
                    .common_upload_dirs
                    .iter()
                    .map(|d| (SourceLocation::CommonUploadDir, current_dir.join(d))),
            )
            .chain(
                config
                    .agent_upload_dirs
                    .iter()
                    .map(|d| (SourceLocation::AgentUploadDir, current_dir.join(d))),
            )
            .filter(|(_, path)| fs.is_dir(path))
            .map(|(location, path)| SearchRoot {
                location,
                path: normalize(&path),
            });

        Self::new(candidates)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchRoot> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Strip `.` components so `./uploads` under `/srv` and `/srv/uploads`
/// compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::conversion::resolver::filesystem::LocalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(temp: &Path, common: Vec<PathBuf>, agent: Vec<PathBuf>) -> ResolverConfig {
        ResolverConfig {
            current_dir: None,
            temp_dir: temp.to_path_buf(),
            common_upload_dirs: common,
            agent_upload_dirs: agent,
            max_depth: 4,
        }
    }

    #[test]
    fn test_discover_orders_and_filters_roots() {
        let cwd = TempDir::new().unwrap();
        let tmp = TempDir::new().unwrap();
        fs::create_dir(cwd.path().join("uploads")).unwrap();
        fs::create_dir(cwd.path().join("input")).unwrap();

        let config = config_for(
            tmp.path(),
            vec![PathBuf::from("./uploads"), PathBuf::from("/definitely/missing")],
            vec![
                PathBuf::from("./uploads"),
                PathBuf::from("./input"),
                PathBuf::from("./claude_files"),
            ],
        );

        let roots = SearchRoots::discover(&config, cwd.path(), &LocalFileSystem);
        let listed: Vec<_> = roots.iter().map(|r| (r.location, r.path.clone())).collect();

        assert_eq!(
            listed,
            vec![
                (SourceLocation::CurrentDir, cwd.path().to_path_buf()),
                (SourceLocation::TempDir, tmp.path().to_path_buf()),
                (SourceLocation::CommonUploadDir, cwd.path().join("uploads")),
                (SourceLocation::AgentUploadDir, cwd.path().join("input")),
            ]
        );
    }

    #[test]
    fn test_new_drops_duplicate_paths() {
        let roots = SearchRoots::new(vec![
            SearchRoot {
                location: SourceLocation::TempDir,
                path: PathBuf::from("/tmp"),
            },
            SearchRoot {
                location: SourceLocation::CommonUploadDir,
                path: PathBuf::from("/tmp"),
            },
        ]);
        assert_eq!(roots.len(), 1);
        assert_eq!(
            roots.iter().next().unwrap().location,
            SourceLocation::TempDir
        );
    }
}
