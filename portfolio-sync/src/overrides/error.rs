//! Override file error types.

use crate::projects::PersistError;
use thiserror::Error;

/// Errors that can occur while reading or writing the override file.
#[derive(Debug, Error)]
pub enum OverrideLoadError {
    /// Failed to read or write the file.
    #[error("Failed to access override file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid override mapping.
    #[error("Failed to parse override file '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl OverrideLoadError {
    /// Returns true if the override file does not exist.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::IoError { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Errors that can occur while marking stale projects as hidden.
#[derive(Debug, Error)]
pub enum HideStaleError {
    /// The persisted project dataset could not be read.
    #[error(transparent)]
    Projects(#[from] PersistError),

    /// The override file could not be read or written.
    #[error(transparent)]
    Overrides(#[from] OverrideLoadError),
}
