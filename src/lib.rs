pub mod advisory;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod output;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    AdvisoryIndex, AdvisoryIndexEntry, AdvisoryRecord, AdvisoryTable, Diagnostic, Diagnostics,
};
