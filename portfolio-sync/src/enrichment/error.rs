//! Enrichment error types.

use crate::github::FetchError;
use thiserror::Error;

/// Errors that can occur while enriching a single repository.
///
/// These never abort a run; the affected field is left empty instead.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Downloading the contract or thumbnail failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The contract document is not valid JSON of the expected shape.
    #[error("Invalid contract document: {0}")]
    InvalidContract(#[from] serde_json::Error),

    /// Storing a mirrored thumbnail failed.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
