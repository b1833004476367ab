//! Integration tests for the insight broker actor.

use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use wellbeing_survey::adapters::InsightBroker;
use wellbeing_survey::domain::foundation::UserId;
use wellbeing_survey::domain::insights::InsightEvent;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

fn event(user_id: &UserId, name: &str, n: i64) -> InsightEvent {
    InsightEvent::ready(user_id.clone(), name, json!({ "n": n }))
}

async fn wait_for_count(broker: &InsightBroker, user_id: &UserId, expected: usize) {
    for _ in 0..100 {
        if broker.subscriber_count(user_id).await.unwrap() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("subscriber count never reached {}", expected);
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn every_subscription_receives_each_event_once() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let token = CancellationToken::new();

    let mut subs = Vec::new();
    for _ in 0..5 {
        subs.push(broker.subscribe(alice.clone(), 4, &token).await.unwrap());
    }

    broker.publish(event(&alice, "Mind", 1)).await.unwrap();
    // Fence: the count reply is sent after the publish has been applied.
    assert_eq!(broker.subscriber_count(&alice).await.unwrap(), 5);

    for sub in &mut subs {
        let received = sub.recv().await.unwrap();
        assert_eq!(received.payload["n"], 1);
        assert!(timeout(Duration::from_millis(20), sub.recv()).await.is_err());
    }
}

#[tokio::test]
async fn events_arrive_in_publish_order() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let token = CancellationToken::new();
    let mut sub = broker.subscribe(alice.clone(), 16, &token).await.unwrap();

    for n in 0..10 {
        broker.publish(event(&alice, "Body", n)).await.unwrap();
    }

    for n in 0..10 {
        assert_eq!(sub.recv().await.unwrap().payload["n"], n);
    }
}

#[tokio::test]
async fn events_are_scoped_to_their_user() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let bob = user("bob");
    let token = CancellationToken::new();
    let mut alice_sub = broker.subscribe(alice.clone(), 4, &token).await.unwrap();
    let mut bob_sub = broker.subscribe(bob.clone(), 4, &token).await.unwrap();

    broker.publish(event(&bob, "Mind", 7)).await.unwrap();

    assert_eq!(bob_sub.recv().await.unwrap().user_id, bob);
    assert!(timeout(Duration::from_millis(20), alice_sub.recv()).await.is_err());
}

#[tokio::test]
async fn full_buffer_drops_without_blocking_others() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let token = CancellationToken::new();
    let mut slow = broker.subscribe(alice.clone(), 1, &token).await.unwrap();
    let mut fast = broker.subscribe(alice.clone(), 8, &token).await.unwrap();

    for n in 0..3 {
        broker.publish(event(&alice, "Body", n)).await.unwrap();
    }
    broker.subscriber_count(&alice).await.unwrap();

    assert_eq!(slow.recv().await.unwrap().payload["n"], 0);
    assert!(timeout(Duration::from_millis(20), slow.recv()).await.is_err());

    for n in 0..3 {
        assert_eq!(fast.recv().await.unwrap().payload["n"], n);
    }
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn publish_without_subscribers_is_a_no_op() {
    let broker = InsightBroker::spawn(4);
    let nobody = user("nobody");

    for n in 0..20 {
        timeout(Duration::from_secs(1), broker.publish(event(&nobody, "Mind", n)))
            .await
            .expect("publish blocked")
            .unwrap();
    }
    assert_eq!(broker.subscriber_count(&nobody).await.unwrap(), 0);
}

#[tokio::test]
async fn cancelling_one_subscription_leaves_the_rest() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let parent = CancellationToken::new();
    let mut keep = broker.subscribe(alice.clone(), 4, &parent).await.unwrap();
    let mut gone = broker.subscribe(alice.clone(), 4, &parent).await.unwrap();

    gone.cancel();
    wait_for_count(&broker, &alice, 1).await;
    assert!(gone.recv().await.is_none());

    broker.publish(event(&alice, "Mind", 1)).await.unwrap();
    assert_eq!(keep.recv().await.unwrap().payload["n"], 1);
    // Closed channels stay closed.
    assert!(gone.recv().await.is_none());
}

#[tokio::test]
async fn parent_cancellation_tears_down_every_subscription() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let parent = CancellationToken::new();
    let mut a = broker.subscribe(alice.clone(), 4, &parent).await.unwrap();
    let mut b = broker.subscribe(alice.clone(), 4, &parent).await.unwrap();

    parent.cancel();
    wait_for_count(&broker, &alice, 0).await;

    assert!(a.recv().await.is_none());
    assert!(b.recv().await.is_none());
}

#[tokio::test]
async fn explicit_unsubscribe_twice_is_harmless() {
    let broker = InsightBroker::spawn(64);
    let alice = user("alice");
    let token = CancellationToken::new();
    let mut sub = broker.subscribe(alice.clone(), 4, &token).await.unwrap();

    broker.unsubscribe(alice.clone(), sub.id()).await.unwrap();
    broker.unsubscribe(alice.clone(), sub.id()).await.unwrap();

    assert!(sub.recv().await.is_none());
    assert_eq!(broker.subscriber_count(&alice).await.unwrap(), 0);
}
