//! Source file discovery.
//!
//! [`compile_exclusions`] turns user-supplied directory fragments into
//! [`ExclusionMatcher`]s, and [`TreeDiscoverer`] walks a project tree,
//! pruning excluded subtrees and resolving each surviving file to an
//! absolute path.
//!
//! # Example
//!
//! ```no_run
//! use vulnmap::discovery::{compile_exclusions, discover_files};
//! use vulnmap::Diagnostics;
//!
//! let exclusions = compile_exclusions(&["vendor", "testdata"]);
//! let mut diagnostics = Diagnostics::new();
//!
//! let files = discover_files("./project", "go", &exclusions, &mut diagnostics)?;
//! for file in &files {
//!     println!("{}", file.display());
//! }
//! # Ok::<(), vulnmap::Error>(())
//! ```

mod filter;
mod walker;

pub use filter::{compile_exclusions, is_excluded, normalize_separators, ExclusionMatcher};
pub use walker::{discover_files, resolve_absolute, TreeDiscoverer};
