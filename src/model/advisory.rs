use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One version constraint, usually an `introduced`/`fixed` pair.
///
/// The keys and values are kept as opaque text.
pub type VersionConstraint = BTreeMap<String, String>;

/// Advisories keyed by identifier.
pub type AdvisoryTable = BTreeMap<String, AdvisoryRecord>;

/// Advisory references keyed by affected module name.
///
/// A module absent from the index has no known advisories.
pub type AdvisoryIndex = BTreeMap<String, Vec<AdvisoryIndexEntry>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub pr: String,
    pub commit: String,
    pub context: Vec<String>,
}

/// A single vulnerability advisory as stored in the advisory database.
///
/// Records carry no identifier of their own; the loader derives one from
/// the name of the source the record was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryRecord {
    pub module: String,
    pub package: String,
    pub additional_packages: Vec<AdvisoryRecord>,
    #[serde(rename = "versions")]
    pub version_constraints: Vec<VersionConstraint>,
    pub description: String,
    #[serde(rename = "cves")]
    pub cve_ids: Vec<String>,
    #[serde(rename = "cvss3")]
    pub cvss_scores: Vec<String>,
    pub severities: Vec<String>,
    pub symbols: Vec<String>,
    pub derived_symbols: Vec<String>,
    pub links: Links,
}

impl AdvisoryRecord {
    pub fn new(module: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_versions(mut self, versions: Vec<VersionConstraint>) -> Self {
        self.version_constraints = versions;
        self
    }

    pub fn with_additional_package(mut self, package: AdvisoryRecord) -> Self {
        self.additional_packages.push(package);
        self
    }

    /// Depth of the deepest `additional_packages` chain below this record.
    ///
    /// A record without additional packages has depth 0. Walks with an
    /// explicit stack so hostile input cannot exhaust the call stack.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&AdvisoryRecord, usize)> = vec![(self, 0)];

        while let Some((record, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            for nested in &record.additional_packages {
                pending.push((nested, depth + 1));
            }
        }

        deepest
    }
}

/// A lightweight reference from the module index back into the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryIndexEntry {
    pub identifier: String,
    pub version_constraints: Vec<VersionConstraint>,
}

impl AdvisoryIndexEntry {
    pub fn new(identifier: impl Into<String>, record: &AdvisoryRecord) -> Self {
        Self {
            identifier: identifier.into(),
            version_constraints: record.version_constraints.clone(),
        }
    }
}
