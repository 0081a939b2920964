use super::{NotificationBrokerService, NotificationStream};
use crate::{BrokerConfig, BufferPolicy, EmitResult, Error, Sink};

use async_trait::async_trait;
use showcase_notifications::{Notification, NotificationMessage};
use tracing::{error, info};

/// Broker delivering through in-process sinks only.
///
/// Holds one sink of entities and one of messages. Every send lands on both,
/// converted as needed, so either stream observes every notification.
#[derive(Clone, Debug)]
pub struct LocalBrokerService {
    entities: Sink<Notification>,
    messages: Sink<NotificationMessage>,
}

impl LocalBrokerService {
    /// Creates a broker with fresh sinks.
    #[must_use]
    pub fn new(config: &BrokerConfig) -> Self {
        Self::with_buffer_policy(config.buffer_policy)
    }

    /// Creates a broker with fresh sinks using `policy`.
    #[must_use]
    pub fn with_buffer_policy(policy: BufferPolicy) -> Self {
        Self::with_sinks(Sink::new(policy), Sink::new(policy))
    }

    /// Creates a broker over existing sinks.
    #[must_use]
    pub const fn with_sinks(
        entities: Sink<Notification>,
        messages: Sink<NotificationMessage>,
    ) -> Self {
        Self { entities, messages }
    }

    fn report(kind: &str, result: EmitResult) -> bool {
        if !result.is_success() {
            error!("failed to emit notification {kind}: {result}");
        }
        result.is_success()
    }
}

#[async_trait]
impl NotificationBrokerService for LocalBrokerService {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn open(&self) -> Result<(), Error> {
        if self.entities.is_closed() || self.messages.is_closed() {
            return Err(Error::Closed);
        }

        info!("local notification broker open");

        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        let entities_open = self.entities.close();
        let messages_open = self.messages.close();

        if entities_open || messages_open {
            info!("local notification broker closed");
        }

        Ok(())
    }

    async fn send_notification(&self, notification: &Notification) -> bool {
        let message = NotificationMessage::from(notification);
        let entity_sent = Self::report("entity", self.entities.publish(notification.clone()));
        let message_sent = Self::report("message", self.messages.publish(message));
        entity_sent && message_sent
    }

    async fn send_notification_message(&self, message: NotificationMessage) -> bool {
        let entity = Notification::from(&message);
        let entity_sent = Self::report("entity", self.entities.publish(entity));
        let message_sent = Self::report("message", self.messages.publish(message));
        entity_sent && message_sent
    }

    fn notification_stream(&self) -> NotificationStream<Notification> {
        Box::pin(self.entities.subscribe())
    }

    fn notification_message_stream(&self) -> NotificationStream<NotificationMessage> {
        Box::pin(self.messages.subscribe())
    }
}
