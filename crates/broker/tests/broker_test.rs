//! End-to-end behaviour shared by both broker implementations.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use futures::StreamExt;
use showcase_binder::{Binder, Destination};
use showcase_binder_memory::MemoryBinder;
use showcase_broker::{
    BrokerConfig, BufferPolicy, Error, LocalBrokerService, NotificationBrokerService,
    NotificationStream, QueueBrokerService,
};
use showcase_notifications::{Notification, NotificationMessage, NotificationType, UserRef};
use tokio::time::timeout;

async fn next<T>(stream: &mut NotificationStream<T>) -> Option<T> {
    timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timed out waiting for notification")
}

async fn assert_idle<T: std::fmt::Debug>(stream: &mut NotificationStream<T>) {
    assert_matches!(
        timeout(Duration::from_millis(50), stream.next()).await,
        Err(_)
    );
}

async fn local_broker() -> Arc<dyn NotificationBrokerService> {
    let broker = LocalBrokerService::new(&BrokerConfig::default());
    broker.open().await.unwrap();
    Arc::new(broker)
}

async fn queue_broker(binder: MemoryBinder) -> Arc<dyn NotificationBrokerService> {
    let broker = QueueBrokerService::new(binder, &BrokerConfig::default()).unwrap();
    broker.open().await.unwrap();
    Arc::new(broker)
}

async fn brokers() -> Vec<Arc<dyn NotificationBrokerService>> {
    vec![local_broker().await, queue_broker(MemoryBinder::new()).await]
}

#[tokio::test]
async fn test_message_arrives_as_entity() {
    for broker in brokers().await {
        let mut entities = broker.notification_stream();

        let message = NotificationMessage::new("X", NotificationType::Like).with_user_id("u1");
        assert!(broker.send_notification_message(message).await);

        let entity = next(&mut entities).await.unwrap();
        assert_eq!(entity.content, "X", "{} broker", broker.name());
        assert_eq!(entity.notification_type, NotificationType::Like);
        assert_eq!(entity.user_id(), Some("u1"));
        assert_eq!(entity.id, None);
    }
}

#[tokio::test]
async fn test_two_subscribers_each_get_one_copy() {
    for broker in brokers().await {
        let mut first = broker.notification_message_stream();
        let mut second = broker.notification_message_stream();

        assert!(
            broker
                .send_notification_message(NotificationMessage::new("Y", NotificationType::Info))
                .await
        );

        for stream in [&mut first, &mut second] {
            assert_eq!(next(stream).await.unwrap().content, "Y");
            assert_idle(stream).await;
        }
    }
}

#[tokio::test]
async fn test_order_is_preserved() {
    for broker in brokers().await {
        let mut messages = broker.notification_message_stream();

        for i in 0..20 {
            let message = NotificationMessage::new(format!("n{i}"), NotificationType::Comment);
            assert!(broker.send_notification_message(message).await);
        }

        for i in 0..20 {
            assert_eq!(next(&mut messages).await.unwrap().content, format!("n{i}"));
        }
    }
}

#[tokio::test]
async fn test_late_subscriber_sees_only_new_notifications() {
    for broker in brokers().await {
        let mut early = broker.notification_message_stream();

        for content in ["a", "b"] {
            assert!(
                broker
                    .send_notification_message(NotificationMessage::new(
                        content,
                        NotificationType::Info
                    ))
                    .await
            );
        }
        // Make sure both went through before the late subscriber attaches.
        assert_eq!(next(&mut early).await.unwrap().content, "a");
        assert_eq!(next(&mut early).await.unwrap().content, "b");

        let mut late = broker.notification_message_stream();
        assert!(
            broker
                .send_notification_message(NotificationMessage::new("c", NotificationType::Info))
                .await
        );

        assert_eq!(next(&mut late).await.unwrap().content, "c");
        assert_idle(&mut late).await;
    }
}

#[tokio::test]
async fn test_duplicates_are_not_suppressed() {
    for broker in brokers().await {
        let mut entities = broker.notification_stream();
        let entity = Notification::new("dup", NotificationType::Like).for_user(UserRef::new("u3"));

        assert!(broker.send_notification(&entity).await);
        assert!(broker.send_notification(&entity).await);

        assert_eq!(next(&mut entities).await.unwrap().content, "dup");
        assert_eq!(next(&mut entities).await.unwrap().content, "dup");
    }
}

#[tokio::test]
async fn test_close_finishes_streams_and_rejects_sends() {
    for broker in brokers().await {
        let mut messages = broker.notification_message_stream();

        broker.close().await.unwrap();

        assert_eq!(next(&mut messages).await, None);
        assert!(
            !broker
                .send_notification_message(NotificationMessage::new("x", NotificationType::Info))
                .await
        );
    }
}

#[tokio::test]
async fn test_queue_brokers_share_a_destination() {
    let binder = MemoryBinder::new();
    let first = queue_broker(binder.clone()).await;
    let second = queue_broker(binder).await;

    let mut on_first = first.notification_message_stream();
    let mut on_second = second.notification_message_stream();

    assert!(
        first
            .send_notification_message(NotificationMessage::new("fan out", NotificationType::System))
            .await
    );

    assert_eq!(next(&mut on_first).await.unwrap().content, "fan out");
    assert_eq!(next(&mut on_second).await.unwrap().content, "fan out");
}

#[tokio::test]
async fn test_queue_broker_drops_malformed_payloads() {
    let binder = MemoryBinder::new();
    let broker = queue_broker(binder.clone()).await;
    let mut messages = broker.notification_message_stream();
    let destination = Destination::new(showcase_broker::DEFAULT_DESTINATION).unwrap();

    binder
        .send(&destination, bytes::Bytes::from_static(b"not json"))
        .await
        .unwrap();
    assert!(
        broker
            .send_notification_message(NotificationMessage::new("valid", NotificationType::Info))
            .await
    );

    assert_eq!(next(&mut messages).await.unwrap().content, "valid");
    assert_idle(&mut messages).await;
}

#[tokio::test]
async fn test_queue_broker_reports_binder_failure() {
    let binder = MemoryBinder::new();
    let broker = queue_broker(binder.clone()).await;

    binder.shutdown().await;

    assert!(
        !broker
            .send_notification_message(NotificationMessage::new("lost", NotificationType::Info))
            .await
    );
}

#[tokio::test]
async fn test_queue_broker_open_twice_fails() {
    let broker = QueueBrokerService::new(MemoryBinder::new(), &BrokerConfig::default()).unwrap();

    broker.open().await.unwrap();
    assert_matches!(broker.open().await, Err(Error::AlreadyOpen));
}

#[tokio::test]
async fn test_queue_broker_rejects_invalid_destination() {
    let config = BrokerConfig {
        destination: "notifications.*".to_string(),
        ..BrokerConfig::default()
    };

    assert_matches!(
        QueueBrokerService::new(MemoryBinder::new(), &config),
        Err(Error::Destination(_))
    );
}

#[tokio::test]
async fn test_bounded_local_broker_overflow_is_reported() {
    let broker = LocalBrokerService::with_buffer_policy(BufferPolicy::from_capacity(1));
    let mut stalled = broker.notification_message_stream();

    assert!(
        broker
            .send_notification_message(NotificationMessage::new("1", NotificationType::Info))
            .await
    );
    assert!(
        !broker
            .send_notification_message(NotificationMessage::new("2", NotificationType::Info))
            .await
    );

    assert_eq!(next(&mut stalled).await.unwrap().content, "1");
    assert_idle(&mut stalled).await;
}
