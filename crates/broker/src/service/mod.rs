mod local;
mod queue;

pub use local::LocalBrokerService;
pub use queue::QueueBrokerService;

use crate::Error;

use async_trait::async_trait;
use futures::StreamExt;
use futures::future;
use futures::stream::BoxStream;
use showcase_notifications::{Notification, NotificationMessage};

/// An infinite stream of notifications published after it was created.
pub type NotificationStream<T> = BoxStream<'static, T>;

/// Publish/subscribe facade over notification delivery.
///
/// Sending never fails loudly: the boolean says whether the notification was
/// handed on, and failures are logged by the implementation.
#[async_trait]
pub trait NotificationBrokerService
where
    Self: Send + Sync + 'static,
{
    /// Short name of the implementation, for logs.
    fn name(&self) -> &'static str;

    /// Acquires whatever the broker needs to deliver notifications.
    async fn open(&self) -> Result<(), Error>;

    /// Releases the broker. Every stream finishes; later sends return `false`.
    async fn close(&self) -> Result<(), Error>;

    /// Publishes a persisted notification.
    async fn send_notification(&self, notification: &Notification) -> bool;

    /// Publishes a message.
    async fn send_notification_message(&self, message: NotificationMessage) -> bool;

    /// Notifications published from now on, as entities.
    fn notification_stream(&self) -> NotificationStream<Notification>;

    /// Notifications published from now on, as messages.
    fn notification_message_stream(&self) -> NotificationStream<NotificationMessage>;

    /// Messages addressed to `user_id`, plus broadcasts.
    fn notification_message_stream_for_user(
        &self,
        user_id: &str,
    ) -> NotificationStream<NotificationMessage> {
        let user_id = user_id.to_string();
        self.notification_message_stream()
            .filter(move |message| future::ready(message.is_visible_to(&user_id)))
            .boxed()
    }
}
