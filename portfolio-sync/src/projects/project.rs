//! The project record consumed by the site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the persisted project dataset.
///
/// Field names match what the gallery reads, hence the mix of GitHub's
/// snake_case and the site's camelCase.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    /// Repository name.
    pub id: String,

    /// Repository name.
    pub name: String,

    pub description: Option<String>,

    /// Public GitHub URL. Always null for private repositories.
    pub html_url: Option<String>,

    pub homepage: Option<String>,

    pub language: Option<String>,

    pub stargazers_count: u64,

    pub forks_count: u64,

    /// Remote update time, or generation time for synthetic entries.
    pub updated_at: Option<DateTime<Utc>>,

    pub is_private: bool,

    pub topics: Vec<String>,

    #[serde(rename = "techStack")]
    pub tech_stack: Vec<String>,

    pub category: String,

    pub featured: bool,

    /// Absolute URL or site path of the preview image.
    pub mockup: Option<String>,

    #[serde(rename = "longDescription")]
    pub long_description: Option<String>,

    /// Decided at merge time; the site only filters on it.
    pub hidden: bool,

    pub tagline: Option<String>,

    #[serde(rename = "demoUrl")]
    pub demo_url: Option<String>,

    #[serde(rename = "liveUrl")]
    pub live_url: Option<String>,

    #[serde(rename = "publicDescription")]
    pub public_description: Option<String>,
}
