use showcase_binder::BinderError;
use thiserror::Error;

/// Error type for NATS operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not connect to the server.
    #[error("failed to connect: {0}")]
    Connect(#[from] async_nats::ConnectError),

    /// Publish error.
    #[error("failed to publish: {0}")]
    Publish(async_nats::client::PublishErrorKind),

    /// Subscribe error.
    #[error("failed to subscribe: {0}")]
    Subscribe(String),
}

impl BinderError for Error {}
