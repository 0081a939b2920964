//! Round trip through a live NATS server.
//!
//! Run with `cargo test -p showcase-binder-nats -- --ignored` against a
//! server listening on `NATS_URL` (default `localhost:4222`).

use bytes::Bytes;
use futures::StreamExt;
use showcase_binder::{Binder, Destination};
use showcase_binder_nats::NatsBinder;
use tokio::time::{Duration, timeout};

fn nats_url() -> String {
    std::env::var("NATS_URL").unwrap_or_else(|_| "localhost:4222".to_string())
}

#[tokio::test]
#[ignore = "requires a NATS server"]
async fn test_publish_reaches_listener() {
    let binder = NatsBinder::connect(&nats_url()).await.unwrap();
    let destination = Destination::new("notificationProducer-out-0-test").unwrap();

    let mut stream = binder.listen(&destination).await.unwrap();

    binder
        .send(&destination, Bytes::from_static(b"{\"hello\":1}"))
        .await
        .unwrap();

    let received = timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for payload")
        .expect("subscription ended");

    assert_eq!(received, Bytes::from_static(b"{\"hello\":1}"));
}
