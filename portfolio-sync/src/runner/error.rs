//! Runner error types.

/// Errors that abort a run.
///
/// Anything reported here happens before the dataset is written, so the
/// previous output stays in place.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The repository listing could not be fetched.
    #[error(transparent)]
    Fetch(#[from] crate::github::FetchError),

    /// The dataset could not be written.
    #[error(transparent)]
    Persist(#[from] crate::projects::PersistError),
}
