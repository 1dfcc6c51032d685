//! Error types
//!
//! The engine itself never fails. Errors come from backends whose primitive
//! operations can fail (the file-system adapter) and are passed through the
//! axis that hit them unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Backend failure surfaced through an axis
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation on a file-system entry failed
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path a traverser was asked to start from does not exist
    #[error("no such entry: {}", path.display())]
    NotFound { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the entry the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Io { path, .. } | Error::NotFound { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
