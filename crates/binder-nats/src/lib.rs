//! NATS implementation of the binder crate.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use async_nats::Client;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use showcase_binder::{Binder, Destination, PayloadStream};
use tracing::{debug, info};

/// A binder publishing to and subscribing on NATS subjects named after the
/// destination.
#[derive(Clone, Debug)]
pub struct NatsBinder {
    client: Client,
}

impl NatsBinder {
    /// Connects to the NATS server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connect` if the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let client = async_nats::connect(url).await?;
        info!("connected to NATS at {url}");
        Ok(Self { client })
    }

    /// Wraps an already connected client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Binder for NatsBinder {
    type Error = Error;

    fn name(&self) -> &'static str {
        "nats"
    }

    async fn send(&self, destination: &Destination, payload: Bytes) -> Result<(), Error> {
        debug!("publishing {} bytes to NATS subject {}", payload.len(), destination);

        self.client
            .publish(String::from(destination.clone()), payload)
            .await
            .map_err(|e| Error::Publish(e.kind()))
    }

    async fn listen(&self, destination: &Destination) -> Result<PayloadStream, Error> {
        let subscriber = self
            .client
            .subscribe(String::from(destination.clone()))
            .await
            .map_err(|e| Error::Subscribe(e.to_string()))?;

        debug!("subscribed to NATS subject {}", destination);

        Ok(Box::pin(subscriber.map(|message| message.payload)))
    }
}
