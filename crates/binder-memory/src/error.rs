use showcase_binder::BinderError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// The binder has been shut down.
    #[error("memory binder is shut down")]
    Closed,
}

impl BinderError for Error {}
