use nexus_event_bus::{EventBus, EventBusError, EventReceiverExt};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
struct TestEvent(pub usize);

#[tokio::test]
async fn test_event_flow() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();

    let delivered = bus.publish(TestEvent(42)).unwrap();
    assert_eq!(delivered, 1);

    let received = rx.recv_event().await.unwrap();
    assert_eq!(*received, TestEvent(42));
}

#[tokio::test]
async fn test_publish_without_subscribers_is_not_an_error() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(TestEvent(1)).unwrap(), 0);
}

#[tokio::test]
async fn test_receiver_lagged_recovery() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<TestEvent>(capacity).unwrap();

    let total_messages = 100;
    for i in 0..total_messages {
        bus.publish(TestEvent(i)).unwrap();
    }

    let first = rx.recv_event().await.expect("should recover from lag");
    assert!(
        first.0 >= total_messages - capacity,
        "Should have skipped to the fresh tail of the buffer, got {}",
        first.0
    );

    let second = rx.recv_event().await.expect("should continue receiving");
    assert_eq!(second.0, first.0 + 1);
}

#[tokio::test]
async fn test_multiple_subscribers_and_types_are_isolated() {
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct OtherEvent(pub usize);

    let bus = EventBus::new();
    let mut rx1 = bus.subscribe::<TestEvent>().unwrap();
    let mut rx2 = bus.subscribe::<TestEvent>().unwrap();
    let mut rx_other = bus.subscribe::<OtherEvent>().unwrap();

    bus.publish(TestEvent(7)).unwrap();
    bus.publish(OtherEvent(13)).unwrap();

    assert_eq!(rx1.recv_event().await.unwrap().0, 7);
    assert_eq!(rx2.recv_event().await.unwrap().0, 7);
    assert_eq!(rx_other.recv_event().await.unwrap().0, 13);
}

#[tokio::test]
async fn test_publish_arc_shares_instance() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();

    let event = Arc::new(TestEvent(10));
    bus.publish_arc(event.clone()).unwrap();

    let received = rx.recv_event().await.unwrap();
    assert!(Arc::ptr_eq(&event, &received));
}

#[tokio::test]
async fn test_shutdown_closes_all_channels() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();

    assert_eq!(bus.shutdown(), 1, "expected a single event channel to be closed");
    assert!(rx.recv_event().await.is_none(), "receiver should observe closure after shutdown");
}

#[tokio::test]
async fn test_concurrent_publishers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();

    let handles: Vec<_> = (0..2)
        .map(|n| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    bus.publish(TestEvent(n * 50 + i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let mut received = 0;
    while tokio::time::timeout(Duration::from_millis(100), rx.recv_event()).await.is_ok() {
        received += 1;
    }
    assert_eq!(received, 100, "Should receive all events");
}

#[test]
fn test_invalid_capacity_rejected() {
    let bus = EventBus::new();
    let result = bus.subscribe_with_capacity::<TestEvent>(0);
    assert!(matches!(result, Err(EventBusError::InvalidCapacity { .. })));
}
