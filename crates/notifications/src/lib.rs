//! Notification data model shared by the broker and its collaborators.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod converter;
mod entity;
mod message;
mod notification_type;

pub use converter::NotificationConverter;
pub use entity::{Notification, UserRef};
pub use message::NotificationMessage;
pub use notification_type::{NotificationType, ParseNotificationTypeError};
