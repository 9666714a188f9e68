//! Curated per-repository overrides.
//!
//! The override file is a JSON object keyed by repository name. It is
//! maintained by hand (and by [`hide_stale_projects`]) and takes precedence
//! over what GitHub reports for every field it sets.

mod entry;
mod error;

pub use entry::Override;
pub use error::{HideStaleError, OverrideLoadError};

use crate::projects::read_projects;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Override entries keyed by repository name, in file order.
pub type Overrides = IndexMap<String, Override>;

/// Default location of the override file, relative to the site root.
pub const DEFAULT_OVERRIDES_PATH: &str = "data/project-overrides.json";

/// Loads the override mapping from disk.
///
/// Entries are read one by one: an entry that is not an object is skipped,
/// and a field with the wrong type is ignored without affecting the rest of
/// its entry (see [`Override::from_value`]).
///
/// # Errors
///
/// Returns [`OverrideLoadError`] if the file is missing or is not a JSON
/// object. Callers running a fetch treat this as recoverable and continue
/// with an empty mapping.
pub fn load_overrides(path: &Path) -> Result<Overrides, OverrideLoadError> {
    debug!(path = %path.display(), "Loading overrides");

    let content = std::fs::read_to_string(path).map_err(|e| OverrideLoadError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let raw: Map<String, Value> =
        serde_json::from_str(&content).map_err(|e| OverrideLoadError::JsonError {
            path: path.display().to_string(),
            source: e,
        })?;

    let overrides: Overrides = raw
        .into_iter()
        .filter_map(|(name, value)| Override::from_value(&name, value).map(|entry| (name, entry)))
        .collect();

    info!(count = overrides.len(), "Loaded overrides");
    Ok(overrides)
}

/// Writes the override mapping back to disk as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`OverrideLoadError`] if serialization or the write fails.
pub fn save_overrides(path: &Path, overrides: &Overrides) -> Result<(), OverrideLoadError> {
    let json = serde_json::to_string_pretty(overrides).map_err(|e| {
        OverrideLoadError::JsonError {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    std::fs::write(path, json).map_err(|e| OverrideLoadError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Marks every previously fetched project last updated before `cutoff` as
/// hidden in the override file.
///
/// Entries are created for projects that have no override yet. An explicit
/// `hidden: false` on a stale project is overwritten.
///
/// # Arguments
///
/// * `projects_path` - The persisted project dataset
/// * `overrides_path` - The override file to update (created if missing)
/// * `cutoff` - Projects updated strictly before this instant are hidden
///
/// # Returns
///
/// The number of projects marked hidden.
///
/// # Errors
///
/// Returns [`HideStaleError`] if the dataset cannot be read, the existing
/// override file is malformed, or the updated file cannot be written.
pub fn hide_stale_projects(
    projects_path: &Path,
    overrides_path: &Path,
    cutoff: DateTime<Utc>,
) -> Result<usize, HideStaleError> {
    let projects = read_projects(projects_path)?;

    let mut overrides = match load_overrides(overrides_path) {
        Ok(overrides) => overrides,
        Err(e) if e.is_missing() => {
            info!("No existing overrides, starting fresh");
            Overrides::new()
        }
        Err(e) => return Err(e.into()),
    };

    let mut hidden = 0;
    for project in &projects {
        if project.updated_at.is_some_and(|updated| updated < cutoff) {
            overrides.entry(project.name.clone()).or_default().hidden = Some(true);
            hidden += 1;
        }
    }

    save_overrides(overrides_path, &overrides)?;
    info!(hidden, "Updated overrides");
    Ok(hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{default_cutoff, write_projects, Project};
    use chrono::TimeZone;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn project(name: &str, year: i32) -> Project {
        Project {
            id: name.to_string(),
            name: name.to_string(),
            description: None,
            html_url: None,
            homepage: None,
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            updated_at: Some(Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap()),
            is_private: false,
            topics: Vec::new(),
            tech_stack: Vec::new(),
            category: "Other".to_string(),
            featured: false,
            mockup: None,
            long_description: None,
            hidden: false,
            tagline: None,
            demo_url: None,
            live_url: None,
            public_description: None,
        }
    }

    #[test]
    fn load_valid_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project-overrides.json");
        fs::write(
            &path,
            r#"{
  "foo": { "description": "Better tool", "featured": true },
  "secret": { "hidden": true }
}"#,
        )
        .unwrap();

        let overrides = load_overrides(&path).unwrap();

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["foo"].description.as_deref(), Some("Better tool"));
        assert_eq!(overrides["foo"].featured, Some(true));
        assert_eq!(overrides["secret"].hidden, Some(true));
    }

    #[test]
    fn load_keeps_good_entries_next_to_ill_typed_ones() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project-overrides.json");
        fs::write(
            &path,
            r#"{
  "old-but-shown": { "hidden": false },
  "foo": { "featured": "yes", "category": "Tools" },
  "broken": "not an entry"
}"#,
        )
        .unwrap();

        let overrides = load_overrides(&path).unwrap();

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["old-but-shown"].hidden, Some(false));
        assert_eq!(overrides["foo"].featured, None);
        assert_eq!(overrides["foo"].category.as_deref(), Some("Tools"));
        assert!(!overrides.contains_key("broken"));
    }

    #[test]
    fn load_keeps_file_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project-overrides.json");
        fs::write(&path, r#"{ "zeta": {}, "alpha": {}, "mid": {} }"#).unwrap();

        let overrides = load_overrides(&path).unwrap();

        let names: Vec<&str> = overrides.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn load_overrides_missing_file() {
        let temp = TempDir::new().unwrap();

        let error = load_overrides(&temp.path().join("nope.json")).unwrap_err();
        assert!(error.is_missing());
    }

    #[test]
    fn load_overrides_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project-overrides.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let error = load_overrides(&path).unwrap_err();
        assert!(matches!(error, OverrideLoadError::JsonError { .. }));
        assert!(!error.is_missing());
    }

    #[test]
    fn hide_stale_marks_old_projects() {
        let temp = TempDir::new().unwrap();
        let projects_path = temp.path().join("projects.json");
        let overrides_path = temp.path().join("project-overrides.json");
        write_projects(
            &projects_path,
            &[project("legacy", 2018), project("fresh", 2023)],
        )
        .unwrap();
        fs::write(
            &overrides_path,
            json!({ "legacy": { "category": "Games" } }).to_string(),
        )
        .unwrap();

        let hidden = hide_stale_projects(&projects_path, &overrides_path, default_cutoff()).unwrap();

        assert_eq!(hidden, 1);
        let overrides = load_overrides(&overrides_path).unwrap();
        assert_eq!(overrides["legacy"].hidden, Some(true));
        assert_eq!(overrides["legacy"].category.as_deref(), Some("Games"));
        assert!(!overrides.contains_key("fresh"));
    }

    #[test]
    fn hide_stale_preserves_authoring_order() {
        let temp = TempDir::new().unwrap();
        let projects_path = temp.path().join("projects.json");
        let overrides_path = temp.path().join("project-overrides.json");
        write_projects(&projects_path, &[project("legacy", 2017)]).unwrap();
        fs::write(
            &overrides_path,
            r#"{ "zeta": { "featured": true }, "alpha": { "notes": "kept" } }"#,
        )
        .unwrap();

        hide_stale_projects(&projects_path, &overrides_path, default_cutoff()).unwrap();

        let overrides = load_overrides(&overrides_path).unwrap();
        let names: Vec<&str> = overrides.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "legacy"]);
        assert_eq!(overrides["alpha"].extra.get("notes"), Some(&json!("kept")));
    }

    #[test]
    fn hide_stale_starts_fresh_without_override_file() {
        let temp = TempDir::new().unwrap();
        let projects_path = temp.path().join("projects.json");
        let overrides_path = temp.path().join("project-overrides.json");
        write_projects(&projects_path, &[project("legacy", 2015)]).unwrap();

        let hidden = hide_stale_projects(&projects_path, &overrides_path, default_cutoff()).unwrap();

        assert_eq!(hidden, 1);
        assert_eq!(load_overrides(&overrides_path).unwrap()["legacy"].hidden, Some(true));
    }

    #[test]
    fn hide_stale_refuses_to_clobber_malformed_overrides() {
        let temp = TempDir::new().unwrap();
        let projects_path = temp.path().join("projects.json");
        let overrides_path = temp.path().join("project-overrides.json");
        write_projects(&projects_path, &[project("legacy", 2015)]).unwrap();
        fs::write(&overrides_path, "{ not json").unwrap();

        let result = hide_stale_projects(&projects_path, &overrides_path, default_cutoff());

        assert!(matches!(result, Err(HideStaleError::Overrides(_))));
        assert_eq!(fs::read_to_string(&overrides_path).unwrap(), "{ not json");
    }

    #[test]
    fn hide_stale_requires_projects_file() {
        let temp = TempDir::new().unwrap();

        let result = hide_stale_projects(
            &temp.path().join("projects.json"),
            &temp.path().join("project-overrides.json"),
            default_cutoff(),
        );

        assert!(matches!(result, Err(HideStaleError::Projects(_))));
    }
}
