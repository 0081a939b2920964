use crate::NotificationType;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to the user owning a notification.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserRef {
    /// User identifier.
    pub id: String,

    /// Login name, when loaded.
    pub login: Option<String>,
}

impl UserRef {
    /// A reference carrying only the identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            login: None,
        }
    }
}

/// A notification as the persistence layer models it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Notification {
    /// Persistence identifier; absent until stored.
    pub id: Option<i64>,

    /// Human-readable text.
    pub content: String,

    /// When the notification was created.
    pub created_at: DateTime<Utc>,

    /// When the recipient read it.
    pub read_at: Option<DateTime<Utc>>,

    /// Category.
    pub notification_type: NotificationType,

    /// Identifier of the related resource.
    pub entity_id: Option<String>,

    /// Follow-up operation.
    pub action: Option<String>,

    /// Owning user.
    pub user: Option<UserRef>,
}

impl Notification {
    /// Creates an unpersisted notification stamped with the current time.
    #[must_use]
    pub fn new(content: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            id: None,
            content: content.into(),
            created_at: Utc::now(),
            read_at: None,
            notification_type,
            entity_id: None,
            action: None,
            user: None,
        }
    }

    /// Sets the owning user.
    #[must_use]
    pub fn for_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    /// Identifier of the owning user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    /// Whether the notification has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Marks the notification read at `at`. Keeps the first read time.
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        self.read_at.get_or_insert(at);
    }
}
