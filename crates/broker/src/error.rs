use showcase_binder::DestinationError;
use thiserror::Error;

/// Errors from opening and closing brokers.
///
/// Publishing never returns one of these: emit failures are reported as
/// values, see [`EmitResult`](crate::EmitResult).
#[derive(Debug, Error)]
pub enum Error {
    /// The broker is already open.
    #[error("broker is already open")]
    AlreadyOpen,

    /// The broker was closed and cannot be reopened.
    #[error("broker is closed")]
    Closed,

    /// The configured destination is invalid.
    #[error(transparent)]
    Destination(#[from] DestinationError),

    /// The binder refused to start listening.
    #[error("failed to listen on {destination} via {binder}: {message}")]
    Listen {
        /// Binder backend name.
        binder: &'static str,
        /// Destination name.
        destination: String,
        /// Underlying error.
        message: String,
    },
}
