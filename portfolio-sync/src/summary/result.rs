//! Per-repository enrichment results.

use crate::enrichment::Mockup;
use crate::projects::Project;

/// Result of enriching a single repository.
#[derive(Debug, Clone)]
pub struct RepositoryOutcome {
    /// The merged project.
    pub project: Project,

    /// Whether the repository published a contract document.
    pub contract_found: bool,

    /// How the mockup was resolved.
    pub mockup: Mockup,
}
