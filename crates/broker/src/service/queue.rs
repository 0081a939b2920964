use super::{NotificationBrokerService, NotificationStream};
use crate::{BrokerConfig, Error, NotificationConsumer, NotificationProducer};

use async_trait::async_trait;
use showcase_binder::{Binder, Destination};
use showcase_notifications::{Notification, NotificationMessage};
use tracing::{info, warn};

/// Broker delivering through an external queue.
///
/// Sends go to the producer. Subscribers read the consumer's sink, which is
/// fed by whatever arrives on the destination once the broker is open,
/// including notifications sent by other processes.
#[derive(Debug)]
pub struct QueueBrokerService<B>
where
    B: Binder,
{
    binder: B,
    consumer: NotificationConsumer,
    producer: NotificationProducer<B>,
}

impl<B> QueueBrokerService<B>
where
    B: Binder,
{
    /// Creates a broker on `binder` using the configured destination.
    ///
    /// # Errors
    ///
    /// Returns `Error::Destination` if the configured destination is invalid.
    pub fn new(binder: B, config: &BrokerConfig) -> Result<Self, Error> {
        let destination = Destination::new(config.destination.clone())?;

        Ok(Self::with_parts(
            NotificationProducer::new(binder.clone(), destination),
            NotificationConsumer::new(config.buffer_policy),
            binder,
        ))
    }

    /// Creates a broker from an existing producer and consumer. The consumer
    /// listens on the producer's destination.
    pub const fn with_parts(
        producer: NotificationProducer<B>,
        consumer: NotificationConsumer,
        binder: B,
    ) -> Self {
        Self {
            binder,
            consumer,
            producer,
        }
    }

    /// The consumer feeding this broker's streams.
    pub const fn consumer(&self) -> &NotificationConsumer {
        &self.consumer
    }
}

#[async_trait]
impl<B> NotificationBrokerService for QueueBrokerService<B>
where
    B: Binder,
{
    fn name(&self) -> &'static str {
        "queue"
    }

    async fn open(&self) -> Result<(), Error> {
        self.consumer
            .listen(&self.binder, self.producer.destination())
            .await?;

        info!(
            "queue notification broker open on {} via {}",
            self.producer.destination(),
            self.binder.name()
        );

        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        self.consumer.shutdown().await;

        info!("queue notification broker closed");

        Ok(())
    }

    async fn send_notification(&self, notification: &Notification) -> bool {
        if self.consumer.is_closed() {
            warn!("dropping notification sent to closed queue broker");
            return false;
        }
        self.producer.send(notification).await
    }

    async fn send_notification_message(&self, message: NotificationMessage) -> bool {
        if self.consumer.is_closed() {
            warn!("dropping notification sent to closed queue broker");
            return false;
        }
        self.producer.send_message(&message).await
    }

    fn notification_stream(&self) -> NotificationStream<Notification> {
        self.consumer.stream_of_entities()
    }

    fn notification_message_stream(&self) -> NotificationStream<NotificationMessage> {
        self.consumer.stream_of_messages()
    }
}
