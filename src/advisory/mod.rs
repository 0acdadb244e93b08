//! Advisory database loading and module indexing.
//!
//! Advisories arrive as `(source name, raw text)` pairs from an
//! [`AdvisorySource`], are decoded by an [`AdvisoryDecoder`], and end up in an
//! [`AdvisoryTable`](crate::model::AdvisoryTable) plus a module-keyed
//! [`AdvisoryIndex`](crate::model::AdvisoryIndex).
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vulnmap::advisory::load_all;
//! use vulnmap::Diagnostics;
//!
//! let mut sources = BTreeMap::new();
//! sources.insert(
//!     "db/GO-2021-0001.yaml".to_string(),
//!     "module: example.com/lib\npackage: example.com/lib/http\n".to_string(),
//! );
//!
//! let mut diagnostics = Diagnostics::new();
//! let (table, index) = load_all(sources, &mut diagnostics);
//!
//! assert!(table.contains_key("GO-2021-0001"));
//! assert_eq!(index["example.com/lib"].len(), 1);
//! ```

mod index;
mod loader;
mod source;

pub use index::index_by_module;
pub use loader::{derive_identifier, load_all, AdvisoryLoader, YamlDecoder, MAX_PACKAGE_NESTING};
pub use source::{read_suffix_files, DirectorySource, DEFAULT_SUFFIXES};

use crate::error::Result;
use crate::model::AdvisoryRecord;
use std::collections::BTreeMap;

/// Capability that turns raw advisory text into a record.
pub trait AdvisoryDecoder {
    /// Returns a short name for the format this decoder handles.
    fn format(&self) -> &'static str;

    /// Decodes one advisory.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed advisory.
    fn decode(&self, raw: &str) -> Result<AdvisoryRecord>;
}

/// Provider of raw advisory text keyed by source name.
pub trait AdvisorySource {
    /// Returns a human-readable description of where advisories come from.
    fn name(&self) -> String;

    /// Reads every advisory this source knows about.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn read_all(&self) -> Result<BTreeMap<String, String>>;
}
