//! Runner configuration.

use crate::enrichment::{ThumbnailStore, DEFAULT_ASSETS_DIR, THUMBNAIL_URL_PATH};
use crate::github::DEFAULT_API_BASE;
use crate::overrides::DEFAULT_OVERRIDES_PATH;
use crate::projects::{default_cutoff, DEFAULT_OUTPUT_PATH};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base path of the site when it is served from a subdirectory.
pub const SUBPATH_BASE: &str = "/portfolio-showcase";

/// Default number of repositories enriched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default upper bound for a single GitHub request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the generated site is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    /// Served from the domain root.
    #[default]
    Root,
    /// Served under [`SUBPATH_BASE`] (the GitHub Pages build).
    Subpath,
}

impl DeployMode {
    /// Picks the mode the same way the site build does: GitHub Actions
    /// builds are deployed under a subpath.
    #[must_use]
    pub fn from_github_actions(github_actions: bool) -> Self {
        if github_actions {
            Self::Subpath
        } else {
            Self::Root
        }
    }

    /// Prefix added to every site-relative URL.
    #[must_use]
    pub fn base_path(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Subpath => SUBPATH_BASE,
        }
    }
}

/// Configuration for a fetch-and-merge run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for every API call.
    token: Option<String>,
    /// Deployment target, decides thumbnail URLs.
    deploy_mode: DeployMode,
    /// Path to the override file.
    overrides_path: PathBuf,
    /// Path the project dataset is written to.
    output_path: PathBuf,
    /// Directory mirrored thumbnails are written to.
    assets_dir: PathBuf,
    /// GitHub REST API base URI.
    api_base: String,
    /// Maximum repositories enriched concurrently.
    concurrency: usize,
    /// Upper bound for each GitHub request.
    request_timeout: Duration,
    /// Repositories inactive since before this are hidden by default.
    cutoff: DateTime<Utc>,
}

impl RunnerConfig {
    /// Creates a configuration with the default site layout rooted at `root`.
    pub fn new(root: &Path, token: Option<String>, deploy_mode: DeployMode) -> Self {
        Self {
            token,
            deploy_mode,
            overrides_path: root.join(DEFAULT_OVERRIDES_PATH),
            output_path: root.join(DEFAULT_OUTPUT_PATH),
            assets_dir: root.join(DEFAULT_ASSETS_DIR),
            api_base: DEFAULT_API_BASE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cutoff: default_cutoff(),
        }
    }

    /// Sets a custom override file path.
    pub fn with_overrides_path(mut self, overrides_path: PathBuf) -> Self {
        self.overrides_path = overrides_path;
        self
    }

    /// Sets a custom output path.
    pub fn with_output_path(mut self, output_path: PathBuf) -> Self {
        self.output_path = output_path;
        self
    }

    /// Sets a custom thumbnail directory.
    pub fn with_assets_dir(mut self, assets_dir: PathBuf) -> Self {
        self.assets_dir = assets_dir;
        self
    }

    /// Points the client at a different API base URI.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the enrichment concurrency (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sets the staleness cutoff.
    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the deployment target.
    pub fn deploy_mode(&self) -> DeployMode {
        self.deploy_mode
    }

    /// Returns the override file path.
    pub fn overrides_path(&self) -> &Path {
        &self.overrides_path
    }

    /// Returns the output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the thumbnail directory.
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Returns the API base URI.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the max concurrent enrichments.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the staleness cutoff.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Thumbnail store matching the assets directory and deploy mode.
    pub fn thumbnail_store(&self) -> ThumbnailStore {
        ThumbnailStore::new(
            self.assets_dir.clone(),
            format!("{}{}", self.deploy_mode.base_path(), THUMBNAIL_URL_PATH),
        )
    }
}
