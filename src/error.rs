//! Conditions which abort system matrix generation.
//!
//! Rays leaving the field of view, or missing the axial neighbourhood, are
//! *not* errors: they simply contribute nothing to the matrix.

use std::collections::TryReserveError;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Error, Debug)]
pub enum MatrixError {

    /// The configuration does not describe a run that can be carried out
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Not enough memory to hold the sparse matrix
    #[error("could not grow column {column} of the system matrix beyond {entries} entries: {source}")]
    Allocation {
        column: usize,
        entries: usize,
        #[source] source: TryReserveError,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source] source: std::io::Error,
    },

    /// A matrix file does not have the expected layout
    #[error("malformed matrix file {path:?}: {reason}")]
    Format {
        path: PathBuf,
        reason: String,
    },
}

impl MatrixError {
    pub fn is_configuration(&self) -> bool { matches!(self, Self::Configuration(_)) }
}

/// Attach the offending path to I/O failures
pub(crate) trait WithPath<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| MatrixError::Io { path: path.to_path_buf(), source })
    }
}

impl<T> WithPath<T> for binrw::BinResult<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        let path = path.to_path_buf();
        self.map_err(|e| match e {
            e if e.is_eof() => MatrixError::Format { path, reason: "unexpected end of file".into() },
            binrw::Error::Io(source) => MatrixError::Io { path, source },
            other => MatrixError::Format { path, reason: other.to_string() },
        })
    }
}
