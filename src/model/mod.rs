//! Core data types for advisories, the module index, and diagnostics.
//!
//! This module contains the fundamental types used throughout vulnmap:
//!
//! - [`AdvisoryRecord`] - A single decoded vulnerability advisory
//! - [`AdvisoryTable`] - Advisories keyed by identifier
//! - [`AdvisoryIndex`] - Advisory references keyed by affected module
//! - [`Diagnostics`] - Recovered per-item failures collected during a pass
//! - [`IndexReport`] / [`DiscoveryReport`] - Serializable results for output
//!
//! # Example
//!
//! ```
//! use vulnmap::{AdvisoryIndexEntry, AdvisoryRecord};
//!
//! let record = AdvisoryRecord::new("golang.org/x/text", "golang.org/x/text/language");
//! let entry = AdvisoryIndexEntry::new("GO-2021-0113", &record);
//!
//! assert_eq!(entry.identifier, "GO-2021-0113");
//! ```

mod advisory;
mod diagnostic;
mod report;

pub use advisory::*;
pub use diagnostic::*;
pub use report::*;
