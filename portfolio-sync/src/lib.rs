#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod enrichment;
pub mod github;
pub mod overrides;
pub mod projects;
pub mod runner;
pub mod summary;

pub use enrichment::{
    fetch_contract, resolve_mockup, Contract, EnrichmentError, Mockup, ThumbnailStore,
    CONTRACT_FILE,
};
pub use github::{build_client, get_raw_file, list_repositories, FetchError, RemoteRepo};
pub use overrides::{
    hide_stale_projects, load_overrides, save_overrides, HideStaleError, Override,
    OverrideLoadError, Overrides,
};
pub use projects::{
    build_project, decide_hidden, default_cutoff, mockup_reference, read_projects,
    synthesize_missing, write_projects, PersistError, Project,
};
pub use runner::{DeployMode, Runner, RunnerConfig, RunnerError};
pub use summary::{RepositoryOutcome, RunSummary};
