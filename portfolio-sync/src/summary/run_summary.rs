//! Run summary types.

use super::result::RepositoryOutcome;
use crate::enrichment::Mockup;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of override entries loaded.
    pub overrides_loaded: usize,

    /// Number of repositories returned by the listing.
    pub repositories_fetched: usize,

    /// Number of repositories that published a contract document.
    pub contracts_found: usize,

    /// Number of thumbnails mirrored locally.
    pub thumbnails_mirrored: usize,

    /// Number of thumbnails that could not be mirrored.
    pub thumbnails_failed: usize,

    /// Number of projects created from overrides alone.
    pub synthetic_projects: usize,

    /// Number of projects written, hidden ones included.
    pub projects_written: usize,

    /// Number of written projects marked hidden.
    pub hidden_projects: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with an enrichment result.
    pub fn record_outcome(&mut self, outcome: &RepositoryOutcome) {
        if outcome.contract_found {
            self.contracts_found += 1;
        }
        match outcome.mockup {
            Mockup::Mirrored(_) => self.thumbnails_mirrored += 1,
            Mockup::Failed => self.thumbnails_failed += 1,
            Mockup::None | Mockup::Remote(_) => {}
        }
    }

    /// Number of projects the gallery shows.
    #[must_use]
    pub fn visible_projects(&self) -> usize {
        self.projects_written.saturating_sub(self.hidden_projects)
    }

    /// Returns true if any per-repository enrichment degraded.
    #[must_use]
    pub fn has_degraded(&self) -> bool {
        self.thumbnails_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::Contract;
    use crate::github::RemoteRepo;
    use crate::projects::{build_project, default_cutoff};
    use serde_json::json;

    fn outcome(contract_found: bool, mockup: Mockup) -> RepositoryOutcome {
        let repository: RemoteRepo =
            serde_json::from_value(json!({ "name": "app", "full_name": "me/app" })).unwrap();
        RepositoryOutcome {
            project: build_project(
                &repository,
                None,
                &Contract::default(),
                mockup.url(),
                default_cutoff(),
            ),
            contract_found,
            mockup,
        }
    }

    #[test]
    fn can_record_outcomes() {
        let mut summary = RunSummary::new();

        summary.record_outcome(&outcome(
            true,
            Mockup::Mirrored("/images/projects/app-thumbnail.png".to_string()),
        ));
        summary.record_outcome(&outcome(false, Mockup::Failed));
        summary.record_outcome(&outcome(false, Mockup::Remote("https://x/y.png".to_string())));
        summary.record_outcome(&outcome(false, Mockup::None));

        assert_eq!(summary.contracts_found, 1);
        assert_eq!(summary.thumbnails_mirrored, 1);
        assert_eq!(summary.thumbnails_failed, 1);
        assert!(summary.has_degraded());
    }

    #[test]
    fn counts_visible_projects() {
        let summary = RunSummary {
            projects_written: 10,
            hidden_projects: 4,
            ..RunSummary::default()
        };
        assert_eq!(summary.visible_projects(), 6);
        assert!(!summary.has_degraded());
    }
}
