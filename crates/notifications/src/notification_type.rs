use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a notification.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// Someone liked a project or comment.
    Like,

    /// Someone commented on a project.
    Comment,

    /// Platform-originated message.
    System,

    /// Keep-alive for push connections. Carries no user-facing content.
    Heartbeat,

    /// Informational message.
    Info,

    /// Something needs the user's attention.
    Warning,
}

impl NotificationType {
    /// All categories, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Like,
        Self::Comment,
        Self::System,
        Self::Heartbeat,
        Self::Info,
        Self::Warning,
    ];

    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Comment => "COMMENT",
            Self::System => "SYSTEM",
            Self::Heartbeat => "HEARTBEAT",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known notification type.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationTypeError(pub String);

impl FromStr for NotificationType {
    type Err = ParseNotificationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNotificationTypeError(s.to_string()))
    }
}
