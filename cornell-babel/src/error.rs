//! Error types for conversion operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting Cornell notes
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Reading the input or writing the output failed
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be read as notes (e.g. not UTF-8)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error while producing the output document
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A shielded math span was dropped or substituted more than once
    #[error("Math placeholder mismatch: {0}")]
    MathLeak(String),

    /// Operation not available in this build or for this format
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.into(),
            source,
        }
    }
}
