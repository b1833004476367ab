//! Subscription handle returned to stream consumers.

use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::domain::foundation::UserId;
use crate::domain::insights::InsightEvent;

/// Unique identifier for one subscription.
///
/// Generated when the subscription is created; a user may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of a broker subscription.
///
/// The sending half lives only in the broker's registry. The channel closes
/// when the broker drops that sender on unsubscribe, after which
/// [`recv`](Self::recv) drains any buffered events and then yields `None`.
///
/// Dropping the handle cancels its token, which makes the broker unregister
/// it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    user_id: UserId,
    receiver: mpsc::Receiver<InsightEvent>,
    token: CancellationToken,
    _guard: DropGuard,
}

impl Subscription {
    pub(super) fn new(
        id: SubscriptionId,
        user_id: UserId,
        receiver: mpsc::Receiver<InsightEvent>,
        token: CancellationToken,
    ) -> Self {
        let guard = token.clone().drop_guard();
        Self {
            id,
            user_id,
            receiver,
            token,
            _guard: guard,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Next event, or `None` once the broker has closed the channel.
    pub async fn recv(&mut self) -> Option<InsightEvent> {
        self.receiver.recv().await
    }

    /// Token cancelled when this subscription is torn down.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Requests teardown; the broker unregisters and closes the channel.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
