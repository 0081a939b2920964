use crate::{Notification, NotificationMessage, UserRef};

/// Maps between [`Notification`] and [`NotificationMessage`].
///
/// Both directions accept an absent input and return an absent output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotificationConverter;

impl NotificationConverter {
    /// Entity to message. The user reference collapses to its identifier.
    #[must_use]
    pub fn to_message(entity: Option<&Notification>) -> Option<NotificationMessage> {
        entity.map(NotificationMessage::from)
    }

    /// Message to entity. The user reference carries only the identifier.
    #[must_use]
    pub fn to_entity(message: Option<&NotificationMessage>) -> Option<Notification> {
        message.map(Notification::from)
    }
}

impl From<&Notification> for NotificationMessage {
    fn from(entity: &Notification) -> Self {
        Self {
            id: entity.id,
            content: entity.content.clone(),
            created_at: entity.created_at,
            read_at: entity.read_at,
            notification_type: entity.notification_type,
            entity_id: entity.entity_id.clone(),
            action: entity.action.clone(),
            user_id: entity.user_id().map(str::to_string),
        }
    }
}

impl From<Notification> for NotificationMessage {
    fn from(entity: Notification) -> Self {
        Self {
            user_id: entity.user.map(|user| user.id),
            id: entity.id,
            content: entity.content,
            created_at: entity.created_at,
            read_at: entity.read_at,
            notification_type: entity.notification_type,
            entity_id: entity.entity_id,
            action: entity.action,
        }
    }
}

impl From<&NotificationMessage> for Notification {
    fn from(message: &NotificationMessage) -> Self {
        Self {
            id: message.id,
            content: message.content.clone(),
            created_at: message.created_at,
            read_at: message.read_at,
            notification_type: message.notification_type,
            entity_id: message.entity_id.clone(),
            action: message.action.clone(),
            user: message.user_id.clone().map(UserRef::new),
        }
    }
}

impl From<NotificationMessage> for Notification {
    fn from(message: NotificationMessage) -> Self {
        Self {
            user: message.user_id.map(UserRef::new),
            id: message.id,
            content: message.content,
            created_at: message.created_at,
            read_at: message.read_at,
            notification_type: message.notification_type,
            entity_id: message.entity_id,
            action: message.action,
        }
    }
}
