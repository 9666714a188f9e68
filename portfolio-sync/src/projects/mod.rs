//! Project records and the merge rules that produce them.
//!
//! Three sources feed a project: the GitHub listing, the curated override
//! file and the repository's own contract document. Each display field is
//! resolved from an ordered list of candidates where the first non-empty
//! value wins:
//!
//! | Field             | Candidates (highest first)                          |
//! |-------------------|-----------------------------------------------------|
//! | `description`     | contract tagline, override description, GitHub      |
//! | `techStack`       | override list, `[language]`, `[]`                   |
//! | `category`        | override category, `"Other"`                        |
//! | `longDescription` | contract public description, override, null         |
//! | `mockup`          | contract thumbnail, override mockup, null           |
//!
//! Empty strings and empty lists count as absent.

mod error;
mod project;

pub use error::PersistError;
pub use project::Project;

use crate::enrichment::Contract;
use crate::github::RemoteRepo;
use crate::overrides::{Override, Overrides};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, info};

/// Default location of the project dataset, relative to the site root.
pub const DEFAULT_OUTPUT_PATH: &str = "src/data/projects.json";

/// Category used when the override does not set one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Description of synthetic entries without one.
const SYNTHETIC_DESCRIPTION: &str = "Private Repository";

/// 2020-01-01T00:00:00Z
const STALE_CUTOFF_SECS: i64 = 1_577_836_800;

/// Repositories without activity since this instant are hidden by default.
#[must_use]
pub fn default_cutoff() -> DateTime<Utc> {
    DateTime::from_timestamp(STALE_CUTOFF_SECS, 0).unwrap_or_default()
}

trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

fn first_present<T: Presence>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_present())
}

/// Picks the mockup reference before any mirroring takes place.
pub fn mockup_reference(entry: Option<&Override>, contract: &Contract) -> Option<String> {
    first_present([
        contract.thumbnail.clone(),
        entry.and_then(|entry| entry.mockup.clone()),
    ])
}

/// Decides whether a repository is hidden from the gallery.
///
/// An explicit override wins either way. Otherwise a repository is hidden
/// when its last activity is strictly before `cutoff`; one with no known
/// activity stays visible.
pub fn decide_hidden(
    entry: Option<&Override>,
    last_activity: Option<DateTime<Utc>>,
    cutoff: DateTime<Utc>,
) -> bool {
    if let Some(hidden) = entry.and_then(|entry| entry.hidden) {
        return hidden;
    }
    last_activity.is_some_and(|activity| activity < cutoff)
}

/// Merges one repository with its override and contract.
///
/// # Arguments
///
/// * `repository` - Repository from the GitHub listing
/// * `entry` - Override for this repository, if any
/// * `contract` - Contract document (empty when the repository has none)
/// * `mockup` - Already-resolved mockup URL
/// * `cutoff` - Staleness threshold for the hidden decision
pub fn build_project(
    repository: &RemoteRepo,
    entry: Option<&Override>,
    contract: &Contract,
    mockup: Option<String>,
    cutoff: DateTime<Utc>,
) -> Project {
    let html_url = if repository.private {
        None
    } else {
        repository.html_url.clone()
    };

    Project {
        id: repository.name.clone(),
        name: repository.name.clone(),
        description: first_present([
            contract.tagline.clone(),
            entry.and_then(|entry| entry.description.clone()),
            repository.description.clone(),
        ]),
        html_url,
        homepage: repository.homepage.clone(),
        language: repository.language.clone(),
        stargazers_count: repository.stargazers_count,
        forks_count: repository.forks_count,
        updated_at: repository.updated_at,
        is_private: repository.private,
        topics: repository.topics.clone(),
        tech_stack: first_present([
            entry.and_then(|entry| entry.tech_stack.clone()),
            first_present([repository.language.clone()]).map(|language| vec![language]),
        ])
        .unwrap_or_default(),
        category: first_present([entry.and_then(|entry| entry.category.clone())])
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        featured: entry.and_then(|entry| entry.featured).unwrap_or(false),
        mockup,
        long_description: first_present([
            contract.public_description.clone(),
            entry.and_then(|entry| entry.long_description.clone()),
        ]),
        hidden: decide_hidden(entry, repository.last_activity(), cutoff),
        tagline: first_present([contract.tagline.clone()]),
        demo_url: first_present([contract.demo_url.clone()]),
        live_url: first_present([contract.live_url.clone()]),
        public_description: first_present([contract.public_description.clone()]),
    }
}

/// Creates projects for override entries GitHub did not list.
///
/// These are typically private repositories the token cannot see. Entries
/// explicitly marked hidden are dropped entirely rather than emitted as
/// hidden projects.
///
/// # Arguments
///
/// * `overrides` - The full override mapping
/// * `repositories` - Everything the listing returned
/// * `generated_at` - Timestamp written as `updated_at`
pub fn synthesize_missing(
    overrides: &Overrides,
    repositories: &[RemoteRepo],
    generated_at: DateTime<Utc>,
) -> Vec<Project> {
    let listed: HashSet<&str> = repositories.iter().map(|repo| repo.name.as_str()).collect();

    overrides
        .iter()
        .filter(|(name, _)| !listed.contains(name.as_str()))
        .filter(|(name, entry)| {
            let dropped = entry.hidden == Some(true);
            if dropped {
                debug!(name = %name, "Skipping hidden override without repository");
            }
            !dropped
        })
        .map(|(name, entry)| Project {
            id: name.clone(),
            name: name.clone(),
            description: first_present([entry.description.clone()])
                .or_else(|| Some(SYNTHETIC_DESCRIPTION.to_string())),
            html_url: None,
            homepage: None,
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            updated_at: Some(generated_at),
            is_private: true,
            topics: Vec::new(),
            tech_stack: first_present([entry.tech_stack.clone()]).unwrap_or_default(),
            category: first_present([entry.category.clone()])
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            featured: entry.featured.unwrap_or(false),
            mockup: first_present([entry.mockup.clone()]),
            long_description: first_present([entry.long_description.clone()]),
            hidden: false,
            tagline: None,
            demo_url: None,
            live_url: None,
            public_description: None,
        })
        .collect()
}

/// Writes the full project list as pretty-printed JSON.
///
/// The file is written next to its destination and renamed into place, so
/// an interrupted write leaves the previous dataset intact. Parent
/// directories are created as needed.
///
/// # Errors
///
/// Returns [`PersistError`] if serialization or any filesystem step fails.
pub fn write_projects(path: &Path, projects: &[Project]) -> Result<(), PersistError> {
    let io_error = |source: std::io::Error| PersistError::IoError {
        path: path.display().to_string(),
        source,
    };

    let json = serde_json::to_string_pretty(projects).map_err(|e| PersistError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_error)?;

    let mut builder = Builder::new();
    // Same mode a plain create would get; the umask still applies.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut file = builder.tempfile_in(parent).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    info!(count = projects.len(), path = %path.display(), "Saved projects");
    Ok(())
}

/// Reads a previously written project dataset.
///
/// # Errors
///
/// Returns [`PersistError`] if the file is missing or malformed.
pub fn read_projects(path: &Path) -> Result<Vec<Project>, PersistError> {
    let content = std::fs::read_to_string(path).map_err(|e| PersistError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| PersistError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}
