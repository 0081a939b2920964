use bytes::Bytes;
use showcase_binder::{Binder, Destination};
use showcase_notifications::{Notification, NotificationMessage};
use tracing::{debug, error};

/// Hands notifications to the external queue.
///
/// Fire-and-forget: a failed send is logged and reported as `false`, never
/// retried.
#[derive(Clone, Debug)]
pub struct NotificationProducer<B>
where
    B: Binder,
{
    binder: B,
    destination: Destination,
}

impl<B> NotificationProducer<B>
where
    B: Binder,
{
    /// Creates a producer writing to `destination`.
    pub const fn new(binder: B, destination: Destination) -> Self {
        Self {
            binder,
            destination,
        }
    }

    /// The destination this producer writes to.
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Converts the entity and sends it. See [`send_message`](Self::send_message).
    pub async fn send(&self, notification: &Notification) -> bool {
        self.send_message(&NotificationMessage::from(notification))
            .await
    }

    /// Serializes the message and sends it. Returns whether the queue accepted it.
    pub async fn send_message(&self, message: &NotificationMessage) -> bool {
        let payload: Bytes = match message.clone().try_into() {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to serialize notification {:?}: {}", message.id, e);
                return false;
            }
        };

        match self.binder.send(&self.destination, payload).await {
            Ok(()) => {
                debug!(
                    "sent {} notification to {} via {}",
                    message.notification_type,
                    self.destination,
                    self.binder.name()
                );
                true
            }
            Err(e) => {
                error!(
                    "failed to send notification to {} via {}: {}",
                    self.destination,
                    self.binder.name(),
                    e
                );
                false
            }
        }
    }
}
