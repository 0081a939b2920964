//! In-process notification broker.
//!
//! Notifications are published through a [`NotificationBrokerService`] and
//! fanned out to every live subscriber. Two implementations exist:
//! - [`LocalBrokerService`] keeps everything in process sinks;
//! - [`QueueBrokerService`] sends through an external queue [`Binder`] and
//!   re-publishes what comes back onto a local sink.
//!
//! [`Binder`]: showcase_binder::Binder
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod consumer;
mod error;
mod heartbeat;
mod producer;
mod service;
mod sink;

pub use config::{BrokerConfig, BufferPolicy, DEFAULT_DESTINATION};
pub use consumer::NotificationConsumer;
pub use error::Error;
pub use heartbeat::Heartbeat;
pub use producer::NotificationProducer;
pub use service::{
    LocalBrokerService, NotificationBrokerService, NotificationStream, QueueBrokerService,
};
pub use sink::{EmitResult, Sink, SinkSubscription};
