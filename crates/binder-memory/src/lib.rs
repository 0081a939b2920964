//! In-memory binder for tests and single-process deployments
//!
//! Routes payloads between listeners of the same `MemoryBinder` (and its
//! clones) inside one process. Every listener of a destination receives every
//! payload sent after it started listening.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use showcase_binder::{Binder, Destination, PayloadStream};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Memory binder implementation
#[derive(Clone, Debug, Default)]
pub struct MemoryBinder {
    listeners: Arc<DashMap<Destination, Vec<flume::Sender<Bytes>>>>,
    closed: Arc<RwLock<bool>>,
}

impl MemoryBinder {
    /// Creates a binder with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live listeners on `destination`.
    #[must_use]
    pub fn listener_count(&self, destination: &Destination) -> usize {
        self.listeners.get(destination).map_or(0, |senders| {
            senders.iter().filter(|sender| !sender.is_disconnected()).count()
        })
    }

    /// Rejects further sends and listens, and ends every listener stream.
    pub async fn shutdown(&self) {
        *self.closed.write().await = true;
        self.listeners.clear();
        info!("memory binder shut down");
    }
}

#[async_trait]
impl Binder for MemoryBinder {
    type Error = Error;

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn send(&self, destination: &Destination, payload: Bytes) -> Result<(), Error> {
        if *self.closed.read().await {
            return Err(Error::Closed);
        }

        debug!("memory binder sending {} bytes to {}", payload.len(), destination);

        if let Some(mut senders) = self.listeners.get_mut(destination) {
            senders.retain(|sender| sender.send(payload.clone()).is_ok());
        }

        Ok(())
    }

    async fn listen(&self, destination: &Destination) -> Result<PayloadStream, Error> {
        if *self.closed.read().await {
            return Err(Error::Closed);
        }

        let (sender, receiver) = flume::unbounded();
        self.listeners
            .entry(destination.clone())
            .or_default()
            .push(sender);

        debug!("memory binder listening on {}", destination);

        Ok(Box::pin(receiver.into_stream()))
    }
}
