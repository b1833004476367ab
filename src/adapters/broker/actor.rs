//! Single-consumer command loop owning the subscriber registry.
//!
//! ```text
//!  subscribe ─┐
//!  unsubscribe├──► command queue (FIFO, bounded) ──► Registry
//!  publish ───┘                                       user-1 ── sub-a, sub-b
//!                                                     user-2 ── sub-c
//! ```
//!
//! The registry is only touched by the loop, so no locks are needed. Fan-out
//! uses `try_send` and never waits on a slow subscriber.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::domain::foundation::UserId;
use crate::domain::insights::InsightEvent;

use super::subscription::SubscriptionId;

/// Commands accepted by the broker loop.
#[derive(Debug)]
pub(super) enum BrokerCommand {
    Subscribe {
        user_id: UserId,
        id: SubscriptionId,
        sender: mpsc::Sender<InsightEvent>,
    },
    Unsubscribe {
        user_id: UserId,
        id: SubscriptionId,
    },
    Publish(InsightEvent),
    SubscriberCount {
        user_id: UserId,
        reply: oneshot::Sender<usize>,
    },
}

/// Per-user subscriber registry.
///
/// Holds the only sender of every subscription channel. Removing an entry
/// drops that sender, which closes the channel exactly once.
#[derive(Debug, Default)]
pub(super) struct Registry {
    subscribers: HashMap<UserId, HashMap<SubscriptionId, mpsc::Sender<InsightEvent>>>,
}

impl Registry {
    pub(super) fn apply(&mut self, command: BrokerCommand) {
        match command {
            BrokerCommand::Subscribe {
                user_id,
                id,
                sender,
            } => self.subscribe(user_id, id, sender),
            BrokerCommand::Unsubscribe { user_id, id } => self.unsubscribe(&user_id, id),
            BrokerCommand::Publish(event) => self.publish(event),
            BrokerCommand::SubscriberCount { user_id, reply } => {
                let _ = reply.send(self.count(&user_id));
            }
        }
    }

    fn subscribe(&mut self, user_id: UserId, id: SubscriptionId, sender: mpsc::Sender<InsightEvent>) {
        debug!(user_id = %user_id, subscription = %id, "Subscriber registered");
        self.subscribers
            .entry(user_id)
            .or_default()
            .insert(id, sender);
    }

    fn unsubscribe(&mut self, user_id: &UserId, id: SubscriptionId) {
        let Some(subs) = self.subscribers.get_mut(user_id) else {
            return;
        };
        if subs.remove(&id).is_some() {
            debug!(user_id = %user_id, subscription = %id, "Subscriber removed");
        }
        if subs.is_empty() {
            self.subscribers.remove(user_id);
        }
    }

    fn publish(&mut self, event: InsightEvent) {
        let Some(subs) = self.subscribers.get_mut(&event.user_id) else {
            trace!(user_id = %event.user_id, insight = %event.name, "No subscribers for event");
            return;
        };

        subs.retain(|id, sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(
                    user_id = %event.user_id,
                    subscription = %id,
                    insight = %event.name,
                    "Subscriber buffer full, event dropped"
                );
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(user_id = %event.user_id, subscription = %id, "Subscriber gone, pruned");
                false
            }
        });

        if subs.is_empty() {
            self.subscribers.remove(&event.user_id);
        }
    }

    pub(super) fn count(&self, user_id: &UserId) -> usize {
        self.subscribers.get(user_id).map(HashMap::len).unwrap_or(0)
    }
}

/// Drains commands until every sender is gone, then drops the registry.
pub(super) async fn run(mut commands: mpsc::Receiver<BrokerCommand>) {
    let mut registry = Registry::default();
    while let Some(command) = commands.recv().await {
        registry.apply(command);
    }
    debug!("Insight broker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::insights::InsightEventKind;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn event(user_id: &str, name: &str) -> InsightEvent {
        InsightEvent::ready(user(user_id), name, serde_json::json!({"n": name}))
    }

    fn subscribe(registry: &mut Registry, user_id: &str, buffer: usize) -> (SubscriptionId, mpsc::Receiver<InsightEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        let id = SubscriptionId::new();
        registry.apply(BrokerCommand::Subscribe {
            user_id: user(user_id),
            id,
            sender: tx,
        });
        (id, rx)
    }

    #[test]
    fn publish_reaches_every_subscription_of_the_user() {
        let mut registry = Registry::default();
        let (_, mut a) = subscribe(&mut registry, "u1", 4);
        let (_, mut b) = subscribe(&mut registry, "u1", 4);
        let (_, mut other) = subscribe(&mut registry, "u2", 4);

        registry.apply(BrokerCommand::Publish(event("u1", "Spirituality")));

        assert_eq!(a.try_recv().unwrap().name, "Spirituality");
        assert_eq!(b.try_recv().unwrap().kind, InsightEventKind::Ready);
        assert!(a.try_recv().is_err());
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let mut registry = Registry::default();
        registry.apply(BrokerCommand::Publish(event("nobody", "x")));
        assert_eq!(registry.count(&user("nobody")), 0);
    }

    #[test]
    fn full_buffer_drops_event_but_keeps_subscription() {
        let mut registry = Registry::default();
        let (_, mut rx) = subscribe(&mut registry, "u1", 1);

        registry.apply(BrokerCommand::Publish(event("u1", "first")));
        registry.apply(BrokerCommand::Publish(event("u1", "second")));

        assert_eq!(rx.try_recv().unwrap().name, "first");
        assert!(rx.try_recv().is_err());
        assert_eq!(registry.count(&user("u1")), 1);

        registry.apply(BrokerCommand::Publish(event("u1", "third")));
        assert_eq!(rx.try_recv().unwrap().name, "third");
    }

    #[test]
    fn unsubscribe_closes_channel_and_stops_delivery() {
        let mut registry = Registry::default();
        let (id, mut rx) = subscribe(&mut registry, "u1", 4);
        let (_, mut kept) = subscribe(&mut registry, "u1", 4);

        registry.apply(BrokerCommand::Unsubscribe { user_id: user("u1"), id });
        registry.apply(BrokerCommand::Publish(event("u1", "after")));

        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
        assert_eq!(kept.try_recv().unwrap().name, "after");
        assert_eq!(registry.count(&user("u1")), 1);
    }

    #[test]
    fn repeated_unsubscribe_is_harmless() {
        let mut registry = Registry::default();
        let (id, _rx) = subscribe(&mut registry, "u1", 4);

        registry.apply(BrokerCommand::Unsubscribe { user_id: user("u1"), id });
        registry.apply(BrokerCommand::Unsubscribe { user_id: user("u1"), id });

        assert_eq!(registry.count(&user("u1")), 0);
    }

    #[test]
    fn dropped_receiver_is_pruned_on_publish() {
        let mut registry = Registry::default();
        let (_, rx) = subscribe(&mut registry, "u1", 4);
        drop(rx);

        registry.apply(BrokerCommand::Publish(event("u1", "x")));
        assert_eq!(registry.count(&user("u1")), 0);
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let mut registry = Registry::default();
        let (_, mut rx) = subscribe(&mut registry, "u1", 8);

        for name in ["a", "b", "c"] {
            registry.apply(BrokerCommand::Publish(event("u1", name)));
        }

        let names: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
