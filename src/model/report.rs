use super::{AdvisoryIndex, AdvisoryTable, Diagnostic, Diagnostics};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Result of loading an advisory database.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub advisory_count: usize,
    pub modules: AdvisoryIndex,
    pub diagnostics: Vec<Diagnostic>,
}

impl IndexReport {
    pub fn new(
        source: impl Into<String>,
        table: &AdvisoryTable,
        modules: AdvisoryIndex,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.into(),
            advisory_count: table.len(),
            modules,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Drops index entries whose identifier fails `keep`, and any module
    /// left without entries.
    pub fn retain_advisories(&mut self, keep: impl Fn(&str) -> bool) {
        for entries in self.modules.values_mut() {
            entries.retain(|entry| keep(&entry.identifier));
        }
        self.modules.retain(|_, entries| !entries.is_empty());
        self.advisory_count = self.modules.values().map(Vec::len).sum();
    }
}

/// Result of walking a source tree.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub generated_at: DateTime<Utc>,
    pub root: PathBuf,
    pub files: BTreeSet<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DiscoveryReport {
    pub fn new(root: impl Into<PathBuf>, files: BTreeSet<PathBuf>, diagnostics: Diagnostics) -> Self {
        Self {
            generated_at: Utc::now(),
            root: root.into(),
            files,
            diagnostics: diagnostics.into_vec(),
        }
    }
}
