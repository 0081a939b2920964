use crate::BufferPolicy;

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Outcome of [`Sink::publish`].
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmitResult {
    /// Queued for every live subscriber. Zero subscribers is still a success.
    Ok {
        /// Number of subscribers the item was queued for.
        subscribers: usize,
    },

    /// The sink is closed.
    FailTerminated,

    /// Some subscribers had a full buffer and missed the item. The others
    /// received it.
    FailOverflow {
        /// Number of subscribers that missed the item.
        lagging: usize,
    },
}

impl EmitResult {
    /// Whether the item was queued for every live subscriber.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl fmt::Display for EmitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { subscribers } => write!(f, "emitted to {subscribers} subscribers"),
            Self::FailTerminated => f.write_str("sink is terminated"),
            Self::FailOverflow { lagging } => {
                write!(f, "buffer overflow for {lagging} subscribers")
            }
        }
    }
}

enum Outlet<T> {
    Unbounded(mpsc::UnboundedSender<T>),
    Bounded(mpsc::Sender<T>),
}

enum Delivery {
    Queued,
    Full,
    Gone,
}

impl<T> Outlet<T> {
    fn deliver(&self, item: T) -> Delivery {
        match self {
            Self::Unbounded(sender) => match sender.send(item) {
                Ok(()) => Delivery::Queued,
                Err(_) => Delivery::Gone,
            },
            Self::Bounded(sender) => match sender.try_send(item) {
                Ok(()) => Delivery::Queued,
                Err(TrySendError::Full(_)) => Delivery::Full,
                Err(TrySendError::Closed(_)) => Delivery::Gone,
            },
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Unbounded(sender) => sender.is_closed(),
            Self::Bounded(sender) => sender.is_closed(),
        }
    }
}

struct State<T> {
    outlets: Vec<Outlet<T>>,
    closed: bool,
}

/// A multicast channel: one write side, any number of independent readers.
///
/// Each subscriber sees, in publish order, every item published after it
/// subscribed. Nothing is replayed. Cloning yields another handle to the same
/// channel.
pub struct Sink<T> {
    policy: BufferPolicy,
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            state: self.state.clone(),
        }
    }
}

impl<T> fmt::Debug for Sink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Sink")
            .field("policy", &self.policy)
            .field("outlets", &state.outlets.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T> Default for Sink<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new(BufferPolicy::Unbounded)
    }
}

impl<T> Sink<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an open sink.
    #[must_use]
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            policy,
            state: Arc::new(Mutex::new(State {
                outlets: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Queues `item` for every live subscriber without waiting.
    ///
    /// Subscribers that went away are pruned here.
    pub fn publish(&self, item: T) -> EmitResult {
        let mut state = self.state.lock();
        if state.closed {
            return EmitResult::FailTerminated;
        }

        let mut subscribers = 0;
        let mut lagging = 0;
        state.outlets.retain(|outlet| match outlet.deliver(item.clone()) {
            Delivery::Queued => {
                subscribers += 1;
                true
            }
            Delivery::Full => {
                lagging += 1;
                true
            }
            Delivery::Gone => false,
        });
        drop(state);

        if lagging > 0 {
            EmitResult::FailOverflow { lagging }
        } else {
            EmitResult::Ok { subscribers }
        }
    }

    /// Starts a new reader. It only sees items published from now on.
    ///
    /// On a closed sink the returned subscription is already finished.
    pub fn subscribe(&self) -> SinkSubscription<T> {
        let mut state = self.state.lock();
        if state.closed {
            return SinkSubscription {
                receiver: Receiver::Finished,
            };
        }

        let receiver = match self.policy {
            BufferPolicy::Unbounded => {
                let (sender, receiver) = mpsc::unbounded_channel();
                state.outlets.push(Outlet::Unbounded(sender));
                Receiver::Unbounded(receiver)
            }
            BufferPolicy::Bounded(capacity) => {
                let (sender, receiver) = mpsc::channel(capacity.get());
                state.outlets.push(Outlet::Bounded(sender));
                Receiver::Bounded(receiver)
            }
        };
        drop(state);

        SinkSubscription { receiver }
    }

    /// Terminates the sink. Subscribers drain what is already buffered and
    /// then finish. Returns `false` if the sink was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        state.outlets.clear();
        true
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of subscribers still attached.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .outlets
            .iter()
            .filter(|outlet| !outlet.is_closed())
            .count()
    }

    /// The buffer policy new subscribers get.
    #[must_use]
    pub const fn policy(&self) -> BufferPolicy {
        self.policy
    }
}

enum Receiver<T> {
    Unbounded(mpsc::UnboundedReceiver<T>),
    Bounded(mpsc::Receiver<T>),
    Finished,
}

/// One reader of a [`Sink`]. Dropping it unsubscribes.
pub struct SinkSubscription<T> {
    receiver: Receiver<T>,
}

impl<T> fmt::Debug for SinkSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.receiver {
            Receiver::Unbounded(_) => "unbounded",
            Receiver::Bounded(_) => "bounded",
            Receiver::Finished => "finished",
        };
        f.debug_struct("SinkSubscription")
            .field("receiver", &kind)
            .finish()
    }
}

impl<T> Stream for SinkSubscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        match &mut self.get_mut().receiver {
            Receiver::Unbounded(receiver) => receiver.poll_recv(cx),
            Receiver::Bounded(receiver) => receiver.poll_recv(cx),
            Receiver::Finished => Poll::Ready(None),
        }
    }
}
