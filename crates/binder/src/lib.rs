//! Abstract interface for binding to an external message queue.
//!
//! A binder moves opaque payloads to and from named destinations. What sits
//! behind a destination (a NATS subject, an in-process topic...) is up to the
//! implementation, provided in separate crates.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod destination;

pub use destination::{Destination, DestinationError};

use std::error::Error;
use std::fmt::Debug;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

/// Inbound payloads for one listener.
pub type PayloadStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Marker trait for binder errors
pub trait BinderError: Error + Send + Sync + 'static {}

/// A binding to an external message queue.
#[async_trait]
pub trait Binder
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the binder.
    type Error: BinderError;

    /// Short name of the backend, for logs.
    fn name(&self) -> &'static str;

    /// Hands a payload to the queue. Success means the queue accepted it, not
    /// that anyone received it.
    async fn send(&self, destination: &Destination, payload: Bytes) -> Result<(), Self::Error>;

    /// Starts receiving payloads sent to `destination` from now on.
    ///
    /// The stream ends when the binder shuts down.
    async fn listen(&self, destination: &Destination) -> Result<PayloadStream, Self::Error>;
}
