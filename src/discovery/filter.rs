//! Exclusion patterns matched on whole path segments.

/// Rewrites Windows separators so paths compare the same on every host.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A compiled exclusion pattern.
///
/// The pattern matches a path when its segments appear as a contiguous run
/// of whole segments in the path, so `vendor` matches `a/vendor/b` but not
/// `vendor2/b`. Pattern characters are always taken literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionMatcher {
    pattern: String,
    segments: Vec<String>,
}

impl ExclusionMatcher {
    pub fn new(raw: &str) -> Self {
        let pattern = normalize_separators(raw);
        let segments = segments(&pattern).map(str::to_string).collect();
        Self { pattern, segments }
    }

    /// The pattern as given, after separator normalization.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        // An empty pattern names no directory.
        if self.segments.is_empty() {
            return false;
        }

        let path = normalize_separators(path);
        let parts: Vec<&str> = segments(&path).collect();

        parts
            .windows(self.segments.len())
            .any(|window| window.iter().zip(&self.segments).all(|(a, b)| *a == b))
    }
}

/// Compiles raw exclusion strings, one matcher per pattern.
///
/// ```
/// use vulnmap::discovery::{compile_exclusions, is_excluded};
///
/// let matchers = compile_exclusions(&["vendor", "third_party\\gen"]);
/// assert!(is_excluded("src/vendor/lib.go", &matchers));
/// assert!(is_excluded("third_party/gen/x.go", &matchers));
/// assert!(!is_excluded("vendor2/lib.go", &matchers));
/// ```
pub fn compile_exclusions(raw: &[impl AsRef<str>]) -> Vec<ExclusionMatcher> {
    raw.iter().map(|p| ExclusionMatcher::new(p.as_ref())).collect()
}

/// Returns true if any matcher matches `path`.
pub fn is_excluded(path: &str, matchers: &[ExclusionMatcher]) -> bool {
    matchers.iter().any(|m| m.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_whole_segment() {
        let m = ExclusionMatcher::new("vendor");

        assert!(m.matches("vendor"));
        assert!(m.matches("vendor/a.go"));
        assert!(m.matches("/p/vendor/a.go"));
        assert!(m.matches("p/vendor"));
        assert!(!m.matches("vendor2/a.go"));
        assert!(!m.matches("my-vendor/a.go"));
        assert!(!m.matches("src/vendored.go"));
    }

    #[test]
    fn test_separator_agnostic() {
        let m = ExclusionMatcher::new("vendor");
        assert!(m.matches("C:\\p\\vendor\\a.go"));

        let nested = ExclusionMatcher::new("internal\\testdata");
        assert_eq!(nested.pattern(), "internal/testdata");
        assert!(nested.matches("pkg/internal/testdata/x.go"));
        assert!(nested.matches("pkg\\internal\\testdata"));
        assert!(!nested.matches("pkg/internal/x/testdata"));
    }

    #[test]
    fn test_surrounding_separators_ignored() {
        let m = ExclusionMatcher::new("/build/");
        assert!(m.matches("a/build/b"));
        assert!(!m.matches("a/builder"));
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let m = ExclusionMatcher::new("gen.*");
        assert!(m.matches("a/gen.*/b.go"));
        assert!(!m.matches("a/generated/b.go"));

        let brackets = ExclusionMatcher::new("[old]");
        assert!(brackets.matches("[old]/a.go"));
        assert!(!brackets.matches("o/a.go"));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let matchers = compile_exclusions(&["", "/"]);
        assert_eq!(matchers.len(), 2);
        assert!(!is_excluded("a/b.go", &matchers));
    }

    #[test]
    fn test_is_excluded_empty_set() {
        let matchers: Vec<ExclusionMatcher> = Vec::new();
        assert!(!is_excluded("vendor/a.go", &matchers));
        assert!(!is_excluded("", &matchers));
    }

    #[test]
    fn test_is_excluded_any_matcher() {
        let matchers = compile_exclusions(&["vendor", "testdata"]);
        assert!(is_excluded("pkg/testdata/a.go", &matchers));
        assert!(is_excluded("vendor/a.go", &matchers));
        assert!(!is_excluded("pkg/a.go", &matchers));
    }
}
