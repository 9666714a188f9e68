//! Mockup resolution and thumbnail mirroring.
//!
//! A mockup reference is either an absolute URL, used as-is, or a path
//! inside the repository. Repository paths are downloaded through the
//! contents API (which also works for private repositories) and stored
//! under the site's public assets so the page never links into GitHub.

use super::EnrichmentError;
use crate::github::{get_raw_file, RemoteRepo};
use octocrab::Octocrab;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Default thumbnail directory, relative to the site root.
pub const DEFAULT_ASSETS_DIR: &str = "public/images/projects";

/// Site path the assets directory is served from, before any base path.
pub const THUMBNAIL_URL_PATH: &str = "/images/projects";

/// Where mirrored thumbnails are written and how the site links to them.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    dir: PathBuf,
    url_prefix: String,
}

impl ThumbnailStore {
    /// Creates a store writing to `dir` and linking via `url_prefix`.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Returns the directory thumbnails are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Local path for a thumbnail file.
    pub fn local_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Site-relative URL for a thumbnail file.
    pub fn site_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), file_name)
    }
}

/// Outcome of resolving a project's mockup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mockup {
    /// Neither the contract nor the override names a mockup.
    None,

    /// Absolute URL, passed through untouched.
    Remote(String),

    /// Repository file mirrored locally; holds the site path.
    Mirrored(String),

    /// Repository file could not be mirrored; the mockup is dropped.
    Failed,
}

impl Mockup {
    /// The URL to publish, if any.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        match self {
            Self::Remote(url) | Self::Mirrored(url) => Some(url.clone()),
            Self::None | Self::Failed => None,
        }
    }
}

/// Returns true if the reference is a complete URL rather than a path.
pub fn is_absolute_url(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

/// Strips a single leading `./` or `/` from a repository path.
pub fn repository_path(reference: &str) -> &str {
    reference
        .strip_prefix("./")
        .or_else(|| reference.strip_prefix('/'))
        .unwrap_or(reference)
}

/// Local file name for a repository's thumbnail, keeping the source
/// extension: `<repo-name>-thumbnail<.ext>`.
pub fn local_file_name(repo_name: &str, source_path: &str) -> String {
    let extension = Path::new(source_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{repo_name}-thumbnail{extension}")
}

/// Resolves a mockup reference, mirroring repository files locally.
///
/// Failures are logged and reported as [`Mockup::Failed`] so the project
/// never points at a broken image.
pub async fn resolve_mockup(
    octocrab: &Octocrab,
    repository: &RemoteRepo,
    reference: Option<&str>,
    store: &ThumbnailStore,
    timeout: Duration,
) -> Mockup {
    let Some(reference) = reference else {
        return Mockup::None;
    };

    if is_absolute_url(reference) {
        return Mockup::Remote(reference.to_string());
    }

    match mirror_thumbnail(octocrab, repository, reference, store, timeout).await {
        Ok(site_path) => {
            info!(repo = %repository.name, path = %site_path, "Mirrored thumbnail");
            Mockup::Mirrored(site_path)
        }
        Err(e) => {
            warn!(
                repo = %repository.name,
                reference,
                error = %e,
                "Failed to mirror thumbnail, dropping mockup"
            );
            Mockup::Failed
        }
    }
}

async fn mirror_thumbnail(
    octocrab: &Octocrab,
    repository: &RemoteRepo,
    reference: &str,
    store: &ThumbnailStore,
    timeout: Duration,
) -> Result<String, EnrichmentError> {
    let source = repository_path(reference);
    let file_name = local_file_name(&repository.name, source);

    let bytes = get_raw_file(octocrab, &repository.full_name, source, timeout).await?;

    let local_path = store.local_path(&file_name);
    tokio::fs::create_dir_all(store.dir())
        .await
        .map_err(|e| EnrichmentError::WriteFailed {
            path: store.dir().display().to_string(),
            source: e,
        })?;
    tokio::fs::write(&local_path, bytes)
        .await
        .map_err(|e| EnrichmentError::WriteFailed {
            path: local_path.display().to_string(),
            source: e,
        })?;

    Ok(store.site_path(&file_name))
}
