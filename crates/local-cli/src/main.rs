//! CLI binary running a notification broker locally.
//!
//! Lines read from stdin are published as notifications: a line holding a JSON
//! notification message is sent as is, anything else becomes an `INFO`
//! broadcast. Every delivered notification is printed to stdout as one JSON
//! line. Logs go to stderr.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use futures::StreamExt;
use showcase_binder_memory::MemoryBinder;
use showcase_binder_nats::NatsBinder;
use showcase_broker::{
    BrokerConfig, BufferPolicy, DEFAULT_DESTINATION, Heartbeat, LocalBrokerService,
    NotificationBrokerService, NotificationStream, QueueBrokerService,
};
use showcase_notifications::{NotificationMessage, NotificationType};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Broker error
    #[error(transparent)]
    Broker(#[from] showcase_broker::Error),

    /// NATS binder error
    #[error(transparent)]
    Nats(#[from] showcase_binder_nats::Error),

    /// The printer task panicked
    #[error("printer task failed: {0}")]
    Printer(#[from] tokio::task::JoinError),
}

/// Which broker implementation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// In-process sinks only
    Local,
    /// Queue-backed broker over the in-memory binder
    MemoryQueue,
    /// Queue-backed broker over NATS
    Nats,
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Broker implementation
    #[arg(long, value_enum, default_value_t = Mode::Local, env = "SHOWCASE_MODE")]
    mode: Mode,

    /// NATS server URL (nats mode only)
    #[arg(long, default_value = "nats://localhost:4222", env = "SHOWCASE_NATS_URL")]
    nats_url: String,

    /// Queue destination notifications are published to
    #[arg(long, default_value = DEFAULT_DESTINATION, env = "SHOWCASE_DESTINATION")]
    destination: String,

    /// Per-subscriber buffer capacity, 0 for unbounded
    #[arg(long, default_value_t = 0, env = "SHOWCASE_BUFFER_CAPACITY")]
    buffer_capacity: usize,

    /// Seconds between heartbeat notifications, 0 to disable
    #[arg(long, default_value_t = 30, env = "SHOWCASE_HEARTBEAT_INTERVAL_SECS")]
    heartbeat_interval_secs: u64,

    /// Only print notifications addressed to this user or broadcast
    #[arg(long, env = "SHOWCASE_USER_ID")]
    user_id: Option<String>,
}

impl Args {
    fn broker_config(&self) -> BrokerConfig {
        BrokerConfig {
            destination: self.destination.clone(),
            buffer_policy: BufferPolicy::from_capacity(self.buffer_capacity),
            heartbeat_interval: (self.heartbeat_interval_secs > 0)
                .then(|| Duration::from_secs(self.heartbeat_interval_secs)),
        }
    }
}

async fn build_broker(
    args: &Args,
    config: &BrokerConfig,
) -> Result<Arc<dyn NotificationBrokerService>, Error> {
    let broker: Arc<dyn NotificationBrokerService> = match args.mode {
        Mode::Local => Arc::new(LocalBrokerService::new(config)),
        Mode::MemoryQueue => Arc::new(QueueBrokerService::new(MemoryBinder::new(), config)?),
        Mode::Nats => {
            let binder = NatsBinder::connect(&args.nats_url).await?;
            Arc::new(QueueBrokerService::new(binder, config)?)
        }
    };

    Ok(broker)
}

/// Turns one input line into a notification, or `None` for a blank line.
fn parse_line(line: &str) -> Option<NotificationMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    Some(
        NotificationMessage::from_json(line.as_bytes())
            .unwrap_or_else(|_| NotificationMessage::new(line, NotificationType::Info)),
    )
}

async fn print_notifications(mut stream: NotificationStream<NotificationMessage>) {
    while let Some(message) = stream.next().await {
        match message.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("failed to render notification: {e}"),
        }
    }
}

/// Forwards every line of `reader` until it ends, fails, or nobody listens.
///
/// Bytes that are not UTF-8 are replaced rather than rejected.
fn forward_lines<R>(reader: R, sender: &mpsc::UnboundedSender<String>)
where
    R: BufRead,
{
    for line in reader.split(b'\n') {
        match line {
            Ok(bytes) => {
                if sender.send(String::from_utf8_lossy(&bytes).into_owned()).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("failed to read stdin, no more input will be sent: {e}");
                break;
            }
        }
    }
}

// Blocking stdin lives on its own thread so shutdown never waits on a read.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (sender, receiver) = mpsc::unbounded_channel();

    std::thread::spawn(move || forward_lines(std::io::stdin().lock(), &sender));

    receiver
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.broker_config();

    let broker = build_broker(&args, &config).await?;
    broker.open().await?;
    info!("{} notification broker running", broker.name());

    let heartbeat = config
        .heartbeat_interval
        .and_then(|interval| Heartbeat::start(broker.clone(), interval));

    let stream = match &args.user_id {
        Some(user_id) => broker.notification_message_stream_for_user(user_id),
        None => broker.notification_message_stream(),
    };
    let printer = tokio::spawn(print_notifications(stream));

    let shutdown_token = CancellationToken::new();

    let signal_shutdown_token = shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for interrupt signal: {e}");
            return;
        }
        info!("Received interrupt signal");
        signal_shutdown_token.cancel();
    });

    let mut lines = spawn_stdin_reader();
    loop {
        tokio::select! {
            () = shutdown_token.cancelled() => break,
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("stdin closed");
                    break;
                };
                let Some(message) = parse_line(&line) else {
                    continue;
                };
                if !broker.send_notification_message(message).await {
                    warn!("notification was not delivered");
                }
            }
        }
    }

    info!("Shutting down");

    if let Some(heartbeat) = heartbeat {
        heartbeat.shutdown().await;
    }
    broker.close().await?;
    printer.await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    fn read_all(input: &[u8]) -> Vec<String> {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        forward_lines(Cursor::new(input.to_vec()), &sender);
        drop(sender);

        let mut lines = Vec::new();
        while let Ok(line) = receiver.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_input() {
        let lines = read_all(b"before\n\xff\xfe bad\nafter\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "before");
        assert!(lines[1].ends_with(" bad"));
        assert_eq!(lines[2], "after");

        let messages: Vec<_> = lines.iter().filter_map(|line| parse_line(line)).collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].content, "after");
    }

    #[test]
    fn test_last_line_without_newline_is_kept() {
        assert_eq!(read_all(b"one\ntwo"), ["one", "two"]);
    }

    #[test]
    fn test_parse_line_accepts_json() {
        let message = parse_line(r#"{"content":"hi","createdAt":"2024-01-01T00:00:00Z","type":"LIKE","userId":"u1"}"#)
            .unwrap();

        assert_eq!(message.content, "hi");
        assert_eq!(message.notification_type, NotificationType::Like);
        assert_eq!(message.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_parse_line_falls_back_to_info() {
        let message = parse_line("  deploy finished ").unwrap();

        assert_eq!(message.content, "deploy finished");
        assert_eq!(message.notification_type, NotificationType::Info);
        assert!(message.is_broadcast());
    }

    #[test]
    fn test_parse_line_skips_blank() {
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn test_zero_settings_disable_limits() {
        let args = Args::parse_from(["showcase-notifier", "--heartbeat-interval-secs", "0"]);
        let config = args.broker_config();

        assert_eq!(args.mode, Mode::Local);
        assert_eq!(config.destination, DEFAULT_DESTINATION);
        assert_eq!(config.buffer_policy, BufferPolicy::Unbounded);
        assert_eq!(config.heartbeat_interval, None);
    }

    #[test]
    fn test_args_select_queue_mode() {
        let args = Args::parse_from([
            "showcase-notifier",
            "--mode",
            "memory-queue",
            "--buffer-capacity",
            "8",
        ]);
        let config = args.broker_config();

        assert_eq!(args.mode, Mode::MemoryQueue);
        assert_eq!(config.buffer_policy, BufferPolicy::from_capacity(8));
        assert_eq!(config.heartbeat_interval, Some(Duration::from_secs(30)));
    }
}
