//! Project dataset persistence errors.

use thiserror::Error;

/// Errors that can occur while reading or writing the project dataset.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem error.
    #[error("Failed to access '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The dataset could not be serialized or parsed.
    #[error("Invalid project dataset '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
