//! `PORTFOLIO.json` contract documents.

use super::EnrichmentError;
use crate::github::{get_raw_file, RemoteRepo};
use octocrab::Octocrab;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// File name of the contract document in a repository root.
pub const CONTRACT_FILE: &str = "PORTFOLIO.json";

/// Presentation metadata a repository owner can publish from inside the
/// repository itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// One-line pitch; preferred over every other description.
    pub tagline: Option<String>,

    /// Long-form public description.
    pub public_description: Option<String>,

    /// Absolute URL or repository-relative path of a preview image.
    pub thumbnail: Option<String>,

    /// Link to a demo (video, recording, playground).
    pub demo_url: Option<String>,

    /// Link to the running product.
    pub live_url: Option<String>,
}

impl Contract {
    /// Parses a contract from raw file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON object with string
    /// fields.
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Fetches and parses a repository's contract document.
///
/// Returns `None` when the repository has no contract. Any other failure is
/// logged and also yields `None`.
pub async fn fetch_contract(
    octocrab: &Octocrab,
    repository: &RemoteRepo,
    timeout: Duration,
) -> Option<Contract> {
    match try_fetch_contract(octocrab, repository, timeout).await {
        Ok(contract) => {
            debug!(repo = %repository.full_name, "Found contract document");
            Some(contract)
        }
        Err(EnrichmentError::Fetch(e)) if e.is_not_found() => None,
        Err(e) => {
            warn!(
                repo = %repository.full_name,
                error = %e,
                "Ignoring unreadable contract document"
            );
            None
        }
    }
}

async fn try_fetch_contract(
    octocrab: &Octocrab,
    repository: &RemoteRepo,
    timeout: Duration,
) -> Result<Contract, EnrichmentError> {
    let bytes = get_raw_file(octocrab, &repository.full_name, CONTRACT_FILE, timeout).await?;
    Ok(Contract::parse(&bytes)?)
}
