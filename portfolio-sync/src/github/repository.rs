//! Repository records returned by the listing endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository as reported by `GET /user/repos`.
///
/// Only the fields the merger reads are kept; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteRepo {
    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,

    /// Public GitHub URL.
    pub html_url: Option<String>,

    /// Repository description.
    pub description: Option<String>,

    /// Homepage URL configured on the repository.
    pub homepage: Option<String>,

    /// Primary language detected by GitHub.
    pub language: Option<String>,

    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,

    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,

    /// Last time anything about the repository changed.
    pub updated_at: Option<DateTime<Utc>>,

    /// Last push. Null for repositories that never received a push.
    pub pushed_at: Option<DateTime<Utc>>,

    /// Repository topics.
    #[serde(default)]
    pub topics: Vec<String>,
}

impl RemoteRepo {
    /// Timestamp used for the staleness check.
    ///
    /// Code activity (`pushed_at`) is preferred; `updated_at` is only used
    /// when the repository has never been pushed to.
    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.pushed_at.or(self.updated_at)
    }
}
