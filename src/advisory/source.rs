use super::AdvisorySource;
use crate::config::glob_match;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name globs that identify advisory files in a database directory.
pub const DEFAULT_SUFFIXES: &[&str] = &["*.yaml", "*.yml"];

/// Advisories stored as individual files directly under one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    suffixes: Vec<String>,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }
}

impl AdvisorySource for DirectorySource {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        read_suffix_files(&self.dir, &self.suffixes)
    }
}

/// Reads every file directly under `dir` whose name matches one of the
/// `suffixes` globs, keyed by the file's path.
///
/// The directory is not searched recursively. Any read failure aborts the
/// whole call.
pub fn read_suffix_files(dir: &Path, suffixes: &[impl AsRef<str>]) -> Result<BTreeMap<String, String>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !suffixes
            .iter()
            .any(|pattern| glob_match(pattern.as_ref(), &file_name))
        {
            continue;
        }

        let content = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        files.insert(path.display().to_string(), content);
    }

    debug!(dir = %dir.display(), count = files.len(), "Read advisory files");
    Ok(files)
}
