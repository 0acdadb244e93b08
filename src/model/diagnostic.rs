use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A per-item failure that was recovered from during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An advisory source could not be decoded and was skipped.
    MalformedAdvisory { source: String, message: String },
    /// A discovered file could not be resolved to an existing absolute path.
    UnresolvedPath { path: PathBuf, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedAdvisory { source, message } => {
                write!(f, "[skip] Error while parsing {}: {}", source, message)
            }
            Diagnostic::UnresolvedPath { path, message } => {
                write!(f, "[skip] Path {}: {}", path.display(), message)
            }
        }
    }
}

/// Ordered collector of [`Diagnostic`] events.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.events
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_keep_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(Diagnostic::MalformedAdvisory {
            source: "db/a.yaml".to_string(),
            message: "bad".to_string(),
        });
        diagnostics.push(Diagnostic::UnresolvedPath {
            path: PathBuf::from("gone.go"),
            message: "missing".to_string(),
        });

        let kinds: Vec<_> = diagnostics
            .iter()
            .map(|d| matches!(d, Diagnostic::MalformedAdvisory { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_display_names_source() {
        let diagnostic = Diagnostic::MalformedAdvisory {
            source: "db/GO-2021-0001.yaml".to_string(),
            message: "invalid type".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "[skip] Error while parsing db/GO-2021-0001.yaml: invalid type"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::UnresolvedPath {
            path: PathBuf::from("a.go"),
            message: "missing".to_string(),
        });

        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json[0]["kind"], "unresolved_path");
        assert_eq!(json[0]["path"], "a.go");
    }
}
