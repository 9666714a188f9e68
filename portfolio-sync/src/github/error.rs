//! GitHub access error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No credential was configured.
    #[error("GITHUB_TOKEN not found")]
    MissingToken,

    /// The API base URI could not be parsed.
    #[error("Invalid GitHub API base '{base}': {source}")]
    InvalidApiBase {
        base: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// The token cannot be sent as an HTTP header value.
    #[error("GITHUB_TOKEN contains characters that are not valid in a header")]
    InvalidToken,

    /// The platform's root certificates could not be loaded.
    #[error("Failed to load TLS root certificates: {0}")]
    TlsSetup(#[source] std::io::Error),

    /// GitHub API error (transport, auth or a non-success listing response).
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A raw content request returned a non-success status.
    #[error("GitHub API returned {status} for {route}")]
    Status { route: String, status: u16 },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl FetchError {
    /// Returns true if the remote reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
