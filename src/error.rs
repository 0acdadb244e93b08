//! Error types shared by advisory loading and tree discovery.
//!
//! Per-item failures ([`Error::Decode`], [`Error::PackageNesting`] and
//! [`Error::PathResolution`]) are normally absorbed by the caller and turned
//! into [`Diagnostic`](crate::model::Diagnostic) entries. [`Error::Traversal`]
//! and [`Error::Io`] are surfaced to the caller as hard failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to decode advisory: {message}")]
    Decode { message: String },

    #[error("additional_packages nested {depth} levels deep (limit {limit})")]
    PackageNesting { depth: usize, limit: usize },

    #[error("path {} doesn't exist", path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot traverse {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
