use crate::NotificationBrokerService;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use showcase_notifications::NotificationMessage;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Periodically broadcasts `HEARTBEAT` notifications so idle push connections
/// stay open.
#[derive(Debug)]
pub struct Heartbeat {
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl Heartbeat {
    /// Spawns the heartbeat. The first beat is sent one `interval` from now.
    ///
    /// Returns `None` without spawning anything if `interval` is zero.
    #[must_use]
    pub fn start(
        broker: Arc<dyn NotificationBrokerService>,
        interval: Duration,
    ) -> Option<Self> {
        if interval.is_zero() {
            warn!("heartbeat interval is zero, heartbeat disabled");
            return None;
        }

        let shutdown_token = CancellationToken::new();
        let task_tracker = TaskTracker::new();

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(ticker);

        let token = shutdown_token.clone();
        task_tracker.spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        break;
                    }
                    Some(_) = ticks.next() => {
                        if broker.send_notification_message(NotificationMessage::heartbeat()).await {
                            debug!("heartbeat sent via {} broker", broker.name());
                        } else {
                            warn!("heartbeat not delivered by {} broker", broker.name());
                        }
                    }
                }
            }
        });
        task_tracker.close();

        info!("heartbeat started every {:?}", interval);

        Some(Self {
            shutdown_token,
            task_tracker,
        })
    }

    /// Stops the heartbeat and waits for it to exit.
    pub async fn shutdown(&self) {
        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("heartbeat stopped");
    }
}
