//! Best-effort input file location.
//!
//! Agents often pass a file name that does not match what is on disk: a
//! different case, a wrong extension, or the file sitting in an upload
//! staging directory instead of the working directory. The resolver trades
//! precision for recall and searches in tiers, stopping at the first tier
//! that finds something:
//!
//! 1. the path exactly as given
//! 2. direct lookups of every name variant in every search root
//! 3. a recursive walk of every search root matching the same variants
//! 4. a substring scan of the current directory
//!
//! Extension mismatches on the chosen file are logged, never rejected.
//! Files inside scratch workspaces belong to in-flight requests and are never
//! returned.
//!
//! When several roots hold a plausible match, the first file whose name
//! equals the requested name wins, otherwise the first hit in search order.
//! That tie-break is arbitrary for unrelated files sharing a stem and can
//! pick the wrong one.

pub mod filesystem;
pub mod roots;
pub mod variants;

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub use filesystem::{FileSystem, LocalFileSystem};
pub use roots::{SearchRoot, SearchRoots};

use super::error::ConversionError;
use super::workspace::is_inside_workspace;
use crate::core::config::ResolverConfig;
use variants::{NameVariant, derive_variants, stem_of};

/// Where a resolved file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    /// The requested path itself.
    Requested,
    CurrentDir,
    TempDir,
    CommonUploadDir,
    AgentUploadDir,
}

/// How a resolved file's name relates to the requested name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    CaseVariant,
    ExtensionVariant,
    WildcardStem,
    LastResort,
}

/// A file the resolver settled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub absolute_path: PathBuf,
    pub matched_filename: String,
    pub source_location: SourceLocation,
    pub match_kind: MatchKind,
}

impl CandidateFile {
    fn new(path: PathBuf, source_location: SourceLocation, match_kind: MatchKind) -> Self {
        let matched_filename = file_name_of(&path);
        Self {
            absolute_path: path,
            matched_filename,
            source_location,
            match_kind,
        }
    }

    /// Lowercased extension of the resolved file, if any.
    pub fn extension(&self) -> Option<String> {
        self.absolute_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

/// Locates input files using the tiered search described in the module docs.
#[derive(Clone)]
pub struct FileResolver {
    fs: Arc<dyn FileSystem>,
    config: ResolverConfig,
}

impl FileResolver {
    pub fn new(fs: Arc<dyn FileSystem>, config: ResolverConfig) -> Self {
        Self { fs, config }
    }

    /// The directory relative paths are interpreted against.
    pub fn current_dir(&self) -> PathBuf {
        self.config
            .current_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Search roots that currently exist on the host.
    pub fn search_roots(&self) -> SearchRoots {
        SearchRoots::discover(&self.config, &self.current_dir(), self.fs.as_ref())
    }

    /// Resolve `requested` against the roots that exist right now.
    pub fn resolve(
        &self,
        requested: &str,
        expected_extension: Option<&str>,
    ) -> Result<CandidateFile, ConversionError> {
        let roots = self.search_roots();
        self.resolve_with_roots(requested, expected_extension, &roots)
    }

    /// Resolve `requested` against an explicit list of roots.
    #[instrument(skip(self, roots), fields(roots = roots.len()))]
    pub fn resolve_with_roots(
        &self,
        requested: &str,
        expected_extension: Option<&str>,
        roots: &SearchRoots,
    ) -> Result<CandidateFile, ConversionError> {
        let requested = requested.trim();
        if requested.is_empty() {
            return Err(ConversionError::InputMissing);
        }

        let current_dir = self.current_dir();

        // Tier 1: the path as given
        let direct = current_dir.join(requested);
        if self.fs.is_file(&direct) && !is_inside_workspace(&direct) {
            debug!("Direct hit for '{}'", requested);
            let candidate = CandidateFile::new(direct, SourceLocation::Requested, MatchKind::Exact);
            warn_on_extension_mismatch(&candidate, expected_extension);
            return Ok(candidate);
        }

        let file_name = file_name_of(Path::new(requested));
        if file_name.is_empty() {
            return Err(ConversionError::not_found(requested));
        }
        let variants = derive_variants(&file_name, expected_extension);
        debug!(
            "Searching {} roots for {} name variants of '{}'",
            roots.len(),
            variants.len(),
            file_name
        );

        let mut hits = self.direct_pass(roots, &variants);
        for hit in self.recursive_pass(roots, &variants) {
            if !hits.iter().any(|h| h.absolute_path == hit.absolute_path) {
                hits.push(hit);
            }
        }

        if !hits.is_empty() {
            let preferred = hits
                .iter()
                .position(|h| h.matched_filename == file_name)
                .unwrap_or(0);
            let candidate = hits.swap_remove(preferred);
            info!(
                "Resolved '{}' to {} ({:?} in {:?})",
                requested,
                candidate.absolute_path.display(),
                candidate.match_kind,
                candidate.source_location
            );
            warn_on_extension_mismatch(&candidate, expected_extension);
            return Ok(candidate);
        }

        if let Some(candidate) = self.last_resort(&current_dir, &file_name) {
            warn!(
                "Resolved '{}' by last-resort scan to {}",
                requested,
                candidate.absolute_path.display()
            );
            warn_on_extension_mismatch(&candidate, expected_extension);
            return Ok(candidate);
        }

        warn!("No file found for '{}'", requested);
        Err(ConversionError::not_found(requested))
    }

    /// Test every literal variant directly inside every root.
    fn direct_pass(&self, roots: &SearchRoots, variants: &[NameVariant]) -> Vec<CandidateFile> {
        let mut hits = Vec::new();
        for root in roots.iter() {
            for variant in variants.iter().filter(|v| !v.wildcard) {
                let path = root.path.join(&variant.name);
                if self.fs.is_file(&path) && !is_inside_workspace(&path) {
                    hits.push(CandidateFile::new(path, root.location, variant.kind));
                }
            }
        }
        hits
    }

    /// Match every variant, wildcards included, against files below every root.
    fn recursive_pass(&self, roots: &SearchRoots, variants: &[NameVariant]) -> Vec<CandidateFile> {
        let mut hits: Vec<CandidateFile> = Vec::new();
        for root in roots.iter() {
            let files: Vec<PathBuf> = self
                .fs
                .walk_files(&root.path, self.config.max_depth)
                .into_iter()
                .filter(|p| !is_inside_workspace(p))
                .collect();
            for variant in variants {
                for path in files.iter().filter(|p| variant.matches(&file_name_of(p))) {
                    if !hits.iter().any(|h| &h.absolute_path == path) {
                        hits.push(CandidateFile::new(path.clone(), root.location, variant.kind));
                    }
                }
            }
        }
        hits
    }

    /// Scan the current directory for `*<name>*` then `*<stem>*.*`.
    fn last_resort(&self, current_dir: &Path, file_name: &str) -> Option<CandidateFile> {
        let stem = stem_of(file_name);
        let entries: Vec<PathBuf> = self
            .fs
            .list_dir(current_dir)
            .into_iter()
            .filter(|p| !file_name_of(p).starts_with('.') && !is_inside_workspace(p))
            .collect();

        let contains_name = |name: &str| name.contains(file_name);
        let contains_stem = |name: &str| {
            name.find(stem)
                .is_some_and(|i| name[i + stem.len()..].contains('.'))
        };

        [
            &contains_name as &dyn Fn(&str) -> bool,
            &contains_stem as &dyn Fn(&str) -> bool,
        ]
        .into_iter()
        .find_map(|pattern| {
            entries
                .iter()
                .find(|p| pattern(&file_name_of(p)) && self.fs.is_file(p))
                .cloned()
        })
        .map(|path| CandidateFile::new(path, SourceLocation::CurrentDir, MatchKind::LastResort))
    }
}

fn warn_on_extension_mismatch(candidate: &CandidateFile, expected_extension: Option<&str>) {
    let Some(expected) = expected_extension.map(|e| e.trim_start_matches('.').to_lowercase())
    else {
        return;
    };
    if expected.is_empty() {
        return;
    }
    if candidate.extension().as_deref() != Some(expected.as_str()) {
        warn!(
            "Resolved file {} does not have the expected .{} extension; using it anyway",
            candidate.absolute_path.display(),
            expected
        );
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
