//! Orchestrates a fetch-and-merge run.
//!
//! A run loads the overrides, lists every repository, enriches each one
//! concurrently, appends synthetic entries for unlisted overrides and
//! writes the dataset. Only a failed listing or a failed write aborts it.

mod config;
mod error;

pub use config::{
    DeployMode, RunnerConfig, DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT, SUBPATH_BASE,
};
pub use error::RunnerError;

use crate::enrichment::{fetch_contract, resolve_mockup, ThumbnailStore};
use crate::github::{build_client, list_repositories, RemoteRepo};
use crate::overrides::{load_overrides, Override, Overrides};
use crate::projects::{build_project, mockup_reference, synthesize_missing, write_projects};
use crate::summary::{RepositoryOutcome, RunSummary};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use octocrab::Octocrab;
use std::path::Path;
use tracing::{info, info_span, warn, Instrument};

/// Runs the full fetch, merge and persist flow.
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes a run, stamping synthetic entries with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the repository listing or the final write
    /// fails. Nothing is written in either case.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        self.run_at(Utc::now()).await
    }

    /// Executes a run with an explicit generation time.
    ///
    /// `generated_at` is the only input that is not fetched, so two runs
    /// with the same remote data, overrides and `generated_at` write
    /// identical files.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub async fn run_at(&self, generated_at: DateTime<Utc>) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new();

        let overrides = load_overrides_or_default(self.config.overrides_path());
        summary.overrides_loaded = overrides.len();

        let octocrab = build_client(self.config.token(), self.config.api_base())?;
        info!("Fetching repositories");
        let repositories = list_repositories(&octocrab, self.config.request_timeout()).await?;
        info!(count = repositories.len(), "Fetched repositories");
        summary.repositories_fetched = repositories.len();

        let outcomes = enrich_all(&octocrab, &repositories, &overrides, &self.config).await;

        let mut projects = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            summary.record_outcome(&outcome);
            projects.push(outcome.project);
        }

        let synthetic = synthesize_missing(&overrides, &repositories, generated_at);
        if !synthetic.is_empty() {
            info!(
                count = synthetic.len(),
                "Adding manual entries from overrides (not found in listing)"
            );
        }
        summary.synthetic_projects = synthetic.len();
        projects.extend(synthetic);

        summary.projects_written = projects.len();
        summary.hidden_projects = projects.iter().filter(|project| project.hidden).count();

        write_projects(self.config.output_path(), &projects)?;
        Ok(summary)
    }
}

fn load_overrides_or_default(path: &Path) -> Overrides {
    match load_overrides(path) {
        Ok(overrides) => overrides,
        Err(e) => {
            warn!(error = %e, "No usable override file, continuing without overrides");
            Overrides::new()
        }
    }
}

/// Enriches every repository, returning outcomes in listing order.
async fn enrich_all(
    octocrab: &Octocrab,
    repositories: &[RemoteRepo],
    overrides: &Overrides,
    config: &RunnerConfig,
) -> Vec<RepositoryOutcome> {
    let store = config.thumbnail_store();
    let store = &store;

    let mut indexed: Vec<(usize, RepositoryOutcome)> =
        stream::iter(repositories.iter().enumerate())
            .map(move |(index, repository)| {
                let entry = overrides.get(&repository.name);
                async move {
                    let outcome = enrich_repository(octocrab, repository, entry, config, store).await;
                    (index, outcome)
                }
            })
            .buffer_unordered(config.concurrency())
            .collect()
            .await;

    // Completion order is arbitrary.
    indexed.sort_unstable_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

async fn enrich_repository(
    octocrab: &Octocrab,
    repository: &RemoteRepo,
    entry: Option<&Override>,
    config: &RunnerConfig,
    store: &ThumbnailStore,
) -> RepositoryOutcome {
    let span = info_span!("enrich", repo = %repository.full_name);

    async {
        let timeout = config.request_timeout();

        let contract = fetch_contract(octocrab, repository, timeout).await;
        let contract_found = contract.is_some();
        let contract = contract.unwrap_or_default();

        let reference = mockup_reference(entry, &contract);
        let mockup =
            resolve_mockup(octocrab, repository, reference.as_deref(), store, timeout).await;

        let project = build_project(repository, entry, &contract, mockup.url(), config.cutoff());
        RepositoryOutcome {
            project,
            contract_found,
            mockup,
        }
    }
    .instrument(span)
    .await
}
