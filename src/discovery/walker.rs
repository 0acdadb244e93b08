//! Source tree walking with exclusion pruning.

use super::filter::{is_excluded, normalize_separators, ExclusionMatcher};
use crate::error::{Error, Result};
use crate::model::{Diagnostic, Diagnostics};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Walks a project tree and collects source files of one extension.
#[derive(Debug, Clone)]
pub struct TreeDiscoverer {
    extension: String,
    exclusions: Vec<ExclusionMatcher>,
    follow_symlinks: bool,
    max_depth: Option<usize>,
}

impl TreeDiscoverer {
    /// Creates a discoverer for files with `extension` (with or without the
    /// leading dot). An empty extension accepts every file.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            exclusions: Vec::new(),
            follow_symlinks: false,
            max_depth: None,
        }
    }

    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionMatcher>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set whether symbolic links are followed during the walk.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extension.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }

    /// Exclusions are tested against the entry's path relative to `root`, so
    /// the directories above the root never cause a match.
    fn is_pruned(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || self.exclusions.is_empty() {
            return false;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        is_excluded(
            &normalize_separators(&relative.to_string_lossy()),
            &self.exclusions,
        )
    }

    /// Walks `root` and returns the absolute paths of every matching file.
    ///
    /// Excluded directories are not descended into. Files that cannot be
    /// resolved are dropped and recorded in `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Traversal`] if `root` does not exist or cannot be
    /// read.
    pub fn discover(
        &self,
        root: impl AsRef<Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeSet<PathBuf>> {
        let root = root.as_ref();

        fs::metadata(root).map_err(|source| Error::Traversal {
            path: root.to_path_buf(),
            source,
        })?;

        let mut walker = WalkDir::new(root).follow_links(self.follow_symlinks);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut candidates = BTreeSet::new();

        for entry in walker
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(root, entry))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(Error::Traversal {
                        path: root.to_path_buf(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() || !self.matches_extension(entry.path()) {
                continue;
            }

            trace!(path = %entry.path().display(), "Collected candidate");
            candidates.insert(entry.into_path());
        }

        let mut files = BTreeSet::new();
        for candidate in candidates {
            match resolve_absolute(&candidate) {
                Ok(path) => {
                    files.insert(path);
                }
                Err(e) => {
                    debug!(path = %candidate.display(), error = %e, "Dropping unresolved path");
                    diagnostics.push(Diagnostic::UnresolvedPath {
                        path: candidate,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(files)
    }
}

/// Discovers files under `root` with the default walk options.
///
/// Exclusions are matched against each entry's path relative to `root`, not
/// the full path, so directories above `root` never cause a match.
pub fn discover_files(
    root: impl AsRef<Path>,
    extension: &str,
    exclusions: &[ExclusionMatcher],
    diagnostics: &mut Diagnostics,
) -> Result<BTreeSet<PathBuf>> {
    TreeDiscoverer::new(extension)
        .with_exclusions(exclusions.to_vec())
        .discover(root, diagnostics)
}

/// Makes `path` absolute and checks that it exists.
///
/// Symbolic links are not resolved.
pub fn resolve_absolute(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    let absolute = std::path::absolute(path).map_err(|source| Error::PathResolution {
        path: path.to_path_buf(),
        source,
    })?;

    fs::metadata(&absolute).map_err(|source| Error::PathResolution {
        path: absolute.clone(),
        source,
    })?;

    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::compile_exclusions;
    use tempfile::TempDir;

    fn create_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        let vendor = dir.path().join("vendor").join("lib");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(dir.path().join("vendor").join("a.go"), "package vendor").unwrap();
        fs::write(vendor.join("c.go"), "package lib").unwrap();

        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("b.go"), "package src").unwrap();

        let vendor2 = dir.path().join("vendor2");
        fs::create_dir_all(&vendor2).unwrap();
        fs::write(vendor2.join("d.go"), "package vendor2").unwrap();

        fs::write(dir.path().join("readme.md"), "# project").unwrap();

        dir
    }

    #[test]
    fn test_exclusion_prunes_subtree() {
        let dir = create_project();
        let exclusions = compile_exclusions(&["vendor"]);

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(dir.path(), "go", &exclusions, &mut diagnostics).unwrap();

        let expected: BTreeSet<PathBuf> = [
            dir.path().join("src").join("b.go"),
            dir.path().join("vendor2").join("d.go"),
        ]
        .into_iter()
        .collect();

        assert_eq!(files, expected);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_extension_filter() {
        let dir = create_project();

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(dir.path(), ".go", &[], &mut diagnostics).unwrap();

        assert_eq!(files.len(), 4);
        assert!(!files.contains(&dir.path().join("readme.md")));
        assert!(files.iter().all(|f| f.is_absolute()));

        let docs = discover_files(dir.path(), "md", &[], &mut diagnostics).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_exclusion_applies_to_files() {
        let dir = create_project();
        let exclusions = compile_exclusions(&["b.go"]);

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(dir.path(), "go", &exclusions, &mut diagnostics).unwrap();

        assert!(!files.contains(&dir.path().join("src").join("b.go")));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_root_ancestors_never_excluded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("vendor").join("project");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("main.go"), "package main").unwrap();

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(&root, "go", &compile_exclusions(&["vendor"]), &mut diagnostics)
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_empty_tree() {
        let dir = TempDir::new().unwrap();

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(dir.path(), "go", &[], &mut diagnostics).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_root_is_traversal_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let mut diagnostics = Diagnostics::new();
        let err = discover_files(&missing, "go", &[], &mut diagnostics).unwrap_err();

        assert!(matches!(err, Error::Traversal { .. }));
    }

    #[test]
    fn test_max_depth() {
        let dir = create_project();

        let mut diagnostics = Diagnostics::new();
        let files = TreeDiscoverer::new("go")
            .with_max_depth(2)
            .discover(dir.path(), &mut diagnostics)
            .unwrap();

        // vendor/lib/c.go sits at depth 3
        assert_eq!(files.len(), 3);
        assert!(!files.contains(&dir.path().join("vendor").join("lib").join("c.go")));
    }

    #[test]
    fn test_resolve_absolute_idempotent() {
        let first = resolve_absolute("Cargo.toml").unwrap();
        let second = resolve_absolute("Cargo.toml").unwrap();

        assert!(first.is_absolute());
        assert_eq!(first, second);
        assert_eq!(resolve_absolute(&first).unwrap(), first);
    }

    #[test]
    fn test_resolve_absolute_missing() {
        let err = resolve_absolute("definitely/not/here.go").unwrap_err();
        assert!(matches!(err, Error::PathResolution { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_file_is_diagnosed() {
        let dir = create_project();
        std::os::unix::fs::symlink(dir.path().join("gone.go"), dir.path().join("ghost.go"))
            .unwrap();

        let mut diagnostics = Diagnostics::new();
        let files = discover_files(dir.path(), "go", &[], &mut diagnostics).unwrap();

        assert_eq!(files.len(), 4);
        assert_eq!(diagnostics.len(), 1);
        let first = diagnostics.iter().next().cloned();
        match first {
            Some(Diagnostic::UnresolvedPath { path, .. }) => assert!(path.ends_with("ghost.go")),
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_symlinks_is_opt_in() {
        let dir = create_project();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("linked")).unwrap();

        let mut diagnostics = Diagnostics::new();
        let plain = TreeDiscoverer::new("go")
            .discover(dir.path(), &mut diagnostics)
            .unwrap();
        let followed = TreeDiscoverer::new("go")
            .with_follow_symlinks(true)
            .discover(dir.path(), &mut diagnostics)
            .unwrap();

        assert_eq!(plain.len(), 4);
        assert_eq!(followed.len(), 5);
        assert!(followed.contains(&dir.path().join("linked").join("b.go")));
    }
}
