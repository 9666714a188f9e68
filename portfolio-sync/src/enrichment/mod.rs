//! Per-repository enrichment.
//!
//! Everything fetched here is optional: a repository without a contract
//! document or with a thumbnail that cannot be downloaded still produces a
//! project, just with fewer fields filled in.

mod contract;
mod error;
mod thumbnail;

pub use contract::{fetch_contract, Contract, CONTRACT_FILE};
pub use error::EnrichmentError;
pub use thumbnail::{
    is_absolute_url, local_file_name, repository_path, resolve_mockup, Mockup, ThumbnailStore,
    DEFAULT_ASSETS_DIR, THUMBNAIL_URL_PATH,
};
