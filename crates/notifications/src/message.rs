use crate::NotificationType;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification stripped down to plain values so it can cross a
/// serialization boundary.
///
/// Carries no ownership reference: the recipient is only named by `user_id`.
/// A message without a `user_id` is a broadcast.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    /// Persistence identifier, if the notification has been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Human-readable text.
    pub content: String,

    /// When the notification was created.
    pub created_at: DateTime<Utc>,

    /// When the recipient read the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,

    /// Category.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    /// Identifier of the related resource (project, comment, team...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Follow-up operation a client may offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NotificationMessage {
    /// Creates an unaddressed, unpersisted message stamped with the current time.
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
            user_id: None,
        }
    }

    /// Creates a keep-alive message.
    #[must_use]
    pub fn heartbeat() -> Self {
        Self::new("", NotificationType::Heartbeat)
    }

    /// Sets the persistence identifier.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the recipient.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the related resource.
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Sets the follow-up action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Overrides the creation time.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the read time.
    #[must_use]
    pub const fn with_read_at(mut self, read_at: DateTime<Utc>) -> Self {
        self.read_at = Some(read_at);
        self
    }

    /// Whether the message has no specific recipient.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether `user_id` should see this message: addressed to them or broadcast.
    #[must_use]
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.user_id.as_deref().is_none_or(|target| target == user_id)
    }

    /// Parses a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the payload is not a valid message.
    pub fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Renders the message as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl TryFrom<Bytes> for NotificationMessage {
    type Error = serde_json::Error;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        Self::from_json(&bytes)
    }
}

impl TryInto<Bytes> for NotificationMessage {
    type Error = serde_json::Error;

    fn try_into(self) -> Result<Bytes, Self::Error> {
        let writer = serde_json::to_vec(&self)?;
        Ok(Bytes::from(writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let message = NotificationMessage::new("liked your project", NotificationType::Like)
            .with_id(7)
            .with_user_id("u1")
            .with_entity_id("project-42")
            .with_created_at(fixed_time());

        let json: serde_json::Value =
            serde_json::from_str(&message.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "content": "liked your project",
                "createdAt": "2024-03-01T12:00:00Z",
                "type": "LIKE",
                "entityId": "project-42",
                "userId": "u1",
            })
        );
    }

    #[test]
    fn test_null_optionals_are_accepted() {
        let payload = br#"{
            "id": null,
            "content": "hello",
            "createdAt": "2024-03-01T12:00:00Z",
            "readAt": null,
            "type": "INFO",
            "entityId": null,
            "action": null,
            "userId": null
        }"#;

        let message = NotificationMessage::from_json(payload).unwrap();

        assert_eq!(message.id, None);
        assert_eq!(message.notification_type, NotificationType::Info);
        assert!(message.is_broadcast());
    }

    #[test]
    fn test_bytes_codec() {
        let message = NotificationMessage::new("hi", NotificationType::Comment)
            .with_action("open")
            .with_read_at(fixed_time());

        let bytes: Bytes = message.clone().try_into().unwrap();
        let decoded = NotificationMessage::try_from(bytes).unwrap();

        assert_eq!(decoded, message);
    }

    #[test]
    fn test_invalid_payload_is_an_error() {
        assert_matches!(NotificationMessage::from_json(b"{not json"), Err(_));
        assert_matches!(
            NotificationMessage::from_json(br#"{"content":"x","type":"LIKE"}"#),
            Err(_)
        );
    }

    #[test]
    fn test_visibility() {
        let addressed = NotificationMessage::new("x", NotificationType::Like).with_user_id("u1");
        let broadcast = NotificationMessage::new("y", NotificationType::System);

        assert!(addressed.is_visible_to("u1"));
        assert!(!addressed.is_visible_to("u2"));
        assert!(broadcast.is_visible_to("u2"));
    }
}
