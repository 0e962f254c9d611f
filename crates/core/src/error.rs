//! Core error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type for crev
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required file does not exist
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed base64, YAML or other encoded data
    #[error("Format error: {0}")]
    Format(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify an I/O error raised while accessing `path`.
    ///
    /// Missing files become [`Error::NotFound`]; everything else is passed
    /// through unchanged.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(err)
        }
    }

    /// Whether this error means the file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Format(err.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
