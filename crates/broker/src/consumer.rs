use crate::service::NotificationStream;
use crate::{BufferPolicy, EmitResult, Error, Sink};

use futures::StreamExt;
use showcase_binder::{Binder, Destination};
use showcase_notifications::{Notification, NotificationMessage};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Receives notifications from the external queue and republishes them on a
/// local sink for in-process subscribers.
#[derive(Clone, Debug)]
pub struct NotificationConsumer {
    sink: Sink<NotificationMessage>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl NotificationConsumer {
    /// Creates a consumer with its own sink.
    #[must_use]
    pub fn new(buffer_policy: BufferPolicy) -> Self {
        Self::with_sink(Sink::new(buffer_policy))
    }

    /// Creates a consumer republishing onto `sink`.
    #[must_use]
    pub fn with_sink(sink: Sink<NotificationMessage>) -> Self {
        Self {
            sink,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Handles one raw payload from the queue.
    ///
    /// A payload that does not deserialize is logged and dropped.
    pub fn on_message(&self, payload: &[u8]) {
        match NotificationMessage::from_json(payload) {
            Ok(message) => {
                let _ = self.accept(message);
            }
            Err(e) => {
                error!(
                    "dropping undeserializable notification payload {:?}: {}",
                    String::from_utf8_lossy(payload),
                    e
                );
            }
        }
    }

    /// Publishes `message` on the local sink.
    pub fn accept(&self, message: NotificationMessage) -> EmitResult {
        let result = self.sink.publish(message);
        if result.is_success() {
            debug!("notification accepted: {result}");
        } else {
            error!("failed to emit notification: {result}");
        }
        result
    }

    /// Every message accepted from now on.
    #[must_use]
    pub fn stream_of_messages(&self) -> NotificationStream<NotificationMessage> {
        Box::pin(self.sink.subscribe())
    }

    /// Every message accepted from now on, converted to an entity as it passes.
    #[must_use]
    pub fn stream_of_entities(&self) -> NotificationStream<Notification> {
        Box::pin(self.sink.subscribe().map(Notification::from))
    }

    /// Starts draining `destination` on `binder` into [`on_message`](Self::on_message).
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyOpen` if already listening, `Error::Closed` after
    /// shutdown, and `Error::Listen` if the binder refuses.
    pub async fn listen<B>(&self, binder: &B, destination: &Destination) -> Result<(), Error>
    where
        B: Binder,
    {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::Closed);
        }
        // Closing the tracker claims the listener slot before anything awaits.
        if !self.task_tracker.close() {
            return Err(Error::AlreadyOpen);
        }

        let mut payloads = match binder.listen(destination).await {
            Ok(payloads) => payloads,
            Err(e) => {
                if !self.shutdown_token.is_cancelled() {
                    self.task_tracker.reopen();
                }
                return Err(Error::Listen {
                    binder: binder.name(),
                    destination: destination.to_string(),
                    message: e.to_string(),
                });
            }
        };

        info!("consuming notifications from {} via {}", destination, binder.name());

        let consumer = self.clone();
        let shutdown_token = self.shutdown_token.clone();
        let destination = destination.clone();
        self.task_tracker.spawn(async move {
            loop {
                tokio::select! {
                    () = shutdown_token.cancelled() => {
                        break;
                    }
                    payload = payloads.next() => {
                        if let Some(payload) = payload {
                            consumer.on_message(&payload);
                        } else {
                            warn!("inbound stream for {} ended", destination);
                            break;
                        }
                    }
                }
            }
        });

        Ok(())
    }

    /// Stops listening and closes the sink, finishing every stream.
    pub async fn shutdown(&self) {
        info!("notification consumer shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;
        self.sink.close();

        info!("notification consumer shutdown");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Waits for the listener task to exit.
    pub async fn wait(&self) {
        self.task_tracker.wait().await;
    }
}
