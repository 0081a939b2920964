use std::num::NonZeroUsize;
use std::time::Duration;

/// Queue destination notifications are produced to and consumed from.
pub const DEFAULT_DESTINATION: &str = "notificationProducer-out-0";

/// How much a sink buffers for each subscriber.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BufferPolicy {
    /// Buffer without limit. Publishing never fails because a subscriber is slow.
    #[default]
    Unbounded,

    /// Buffer up to the given number of items per subscriber. A subscriber
    /// whose buffer is full misses the item and the publish reports overflow.
    Bounded(NonZeroUsize),
}

impl BufferPolicy {
    /// `0` means unbounded.
    #[must_use]
    pub const fn from_capacity(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Self::Bounded(capacity),
            None => Self::Unbounded,
        }
    }
}

/// Broker configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BrokerConfig {
    /// Queue destination used by the queue-backed broker.
    pub destination: String,

    /// Buffer policy for every sink the broker creates.
    pub buffer_policy: BufferPolicy,

    /// Interval between heartbeat notifications, if any.
    pub heartbeat_interval: Option<Duration>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            buffer_policy: BufferPolicy::Unbounded,
            heartbeat_interval: None,
        }
    }
}
